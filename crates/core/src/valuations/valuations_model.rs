use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};
use crate::trade::Asset;

pub const DEFAULT_VALUES_TTL: Duration = Duration::from_secs(60 * 60);

/// League format a valuation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFormat {
    pub dynasty: bool,
    pub superflex: bool,
}

impl ValueFormat {
    pub const DYNASTY_1QB: ValueFormat = ValueFormat::new(true, false);
    pub const DYNASTY_SF: ValueFormat = ValueFormat::new(true, true);
    pub const REDRAFT_1QB: ValueFormat = ValueFormat::new(false, false);
    pub const REDRAFT_SF: ValueFormat = ValueFormat::new(false, true);

    pub const fn new(dynasty: bool, superflex: bool) -> Self {
        Self { dynasty, superflex }
    }

    pub fn all() -> [ValueFormat; 4] {
        [
            Self::DYNASTY_1QB,
            Self::DYNASTY_SF,
            Self::REDRAFT_1QB,
            Self::REDRAFT_SF,
        ]
    }

    /// Parses `"dynasty"` / `"redraft"` (case-insensitive).
    pub fn parse(format: &str, superflex: bool) -> Result<Self, Error> {
        match format.trim().to_ascii_lowercase().as_str() {
            "dynasty" => Ok(Self::new(true, superflex)),
            "redraft" => Ok(Self::new(false, superflex)),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown format '{other}', expected dynasty or redraft"
            )))),
        }
    }

    /// Number of starting quarterbacks the format assumes.
    pub fn num_qbs(&self) -> u8 {
        if self.superflex {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for ValueFormat {
    /// `Dynasty_SF`, `Redraft_1QB`, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.dynasty { "Dynasty" } else { "Redraft" };
        let qbs = if self.superflex { "SF" } else { "1QB" };
        write!(f, "{kind}_{qbs}")
    }
}

/// Active valuation pool for one format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSnapshot {
    pub format: ValueFormat,
    pub fetched_at: DateTime<Utc>,
    pub assets: Vec<Asset>,
}

impl ValuationSnapshot {
    pub fn find(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }
}
