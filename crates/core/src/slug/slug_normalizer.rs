use std::collections::HashSet;

use super::name_overrides::NameOverrides;

/// Lowercases, trims and reduces `input` to `[a-z0-9]` runs joined by single
/// hyphens. No override lookup.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Returns true for `""` and for strings matching `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() {
        return true;
    }
    !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Maps display names to storage slugs through an override table.
#[derive(Debug, Clone, Default)]
pub struct SlugNormalizer {
    overrides: NameOverrides,
}

impl SlugNormalizer {
    pub fn new(overrides: NameOverrides) -> Self {
        Self { overrides }
    }

    /// Normalizer with the built-in override table.
    pub fn with_builtin_overrides() -> Self {
        Self::new(NameOverrides::builtin())
    }

    pub fn overrides(&self) -> &NameOverrides {
        &self.overrides
    }

    /// Produces the slug for a display name.
    ///
    /// Override values are themselves looked up again, so chained entries
    /// resolve to the last link. A cyclic chain resolves to the smallest slug
    /// on the cycle, which keeps the function idempotent for any table.
    pub fn normalize(&self, name: &str) -> String {
        let mut current = slugify(name);
        let mut path: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        while let Some(value) = self.overrides.get(&current) {
            seen.insert(current.clone());
            path.push(current);
            let next = slugify(value);
            if seen.contains(&next) {
                let start = path.iter().position(|s| *s == next).unwrap_or(0);
                return path[start..]
                    .iter()
                    .min()
                    .cloned()
                    .unwrap_or(next);
            }
            current = next;
        }

        current
    }
}
