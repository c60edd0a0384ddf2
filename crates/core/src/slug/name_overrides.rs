use std::collections::HashMap;
use std::path::Path;

use crate::errors::{Error, Result};

use super::slug_normalizer::slugify;

/// Curated display-name corrections for players whose listing names differ
/// from their profile names.
pub const DEFAULT_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("brian thomas", "brian thomas jr"),
    ("de'von achane", "devon achane"),
    ("josh palmer", "joshua palmer"),
    ("luther burden", "Luther Burden III"),
    ("michael penix", "Michael Penix Jr."),
    ("tyrone tracy", "Tyrone Tracy Jr."),
    ("marvin mims", "Marvin Mims Jr."),
    ("hollywood brown", "Marquise Brown"),
    ("donte thornton", "Dont'e Thornton Jr."),
    ("harold fannin", "Harold Fannin Jr."),
    ("ollie gordon", "Ollie Gordon II"),
    ("calvin austin", "Calvin Austin III"),
    ("joe milton", "Joe Milton III"),
    ("efton chism", "efton chism iii"),
    ("jimmy horn", "Jimmy Horn Jr."),
    ("thomas fidone", "Thomas Fidone II"),
    ("chris rodriguez", "Chris Rodriguez Jr."),
    ("ricky white", "Ricky White III"),
];

/// Lookup table of display-name overrides.
///
/// Keys are stored in slug form, so `"De'Von Achane"`, `"de'von achane"` and
/// `"de-von achane"` all hit the same entry. Values keep their raw form and
/// are normalized again by [`super::SlugNormalizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameOverrides {
    entries: HashMap<String, String>,
}

impl NameOverrides {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        Self::from_pairs(DEFAULT_NAME_OVERRIDES.iter().copied())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (key, value) in pairs {
            table.insert(key.as_ref(), value);
        }
        table
    }

    /// Parses a JSON object of `{"display name": "canonical name"}` pairs.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let map: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self::from_pairs(map))
    }

    /// Loads overrides from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Inserts an override. Keys that slugify to nothing are ignored.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = slugify(key);
        if key.is_empty() {
            return;
        }
        self.entries.insert(key, value.into());
    }

    /// Adds every entry of `other`, replacing existing keys.
    pub fn merge(&mut self, other: NameOverrides) {
        self.entries.extend(other.entries);
    }

    /// Looks up an override by slug-form key.
    pub fn get(&self, slug: &str) -> Option<&str> {
        self.entries.get(slug).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
