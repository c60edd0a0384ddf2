use std::collections::HashMap;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

pub const PICK_POSITION: &str = "PICK";

/// Owner id to the asset ids on that owner's roster.
pub type OwnerHoldings = HashMap<String, Vec<String>>;

/// A tradeable player or draft pick with its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub display_name: String,
    pub position: String,
    #[serde(default, deserialize_with = "deserialize_value")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        position: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            position: position.into(),
            value: sanitize_value(value),
            team: None,
        }
    }

    /// A rookie pick valued by overall slot, e.g. `draft_pick(3, 4000.0)` is
    /// `pick-3` named "Pick 3".
    pub fn draft_pick(pick: u32, value: f64) -> Self {
        Self::new(
            format!("pick-{pick}"),
            format!("Pick {pick}"),
            PICK_POSITION,
            value,
        )
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        let team = team.into();
        self.team = (!team.is_empty()).then_some(team);
        self
    }

    pub fn is_pick(&self) -> bool {
        self.position == PICK_POSITION
    }

    /// Active assets have a name and a positive value.
    pub fn is_active(&self) -> bool {
        self.value > 0.0 && !self.display_name.trim().is_empty()
    }
}

/// Negative, NaN and infinite values become 0.
pub(crate) fn sanitize_value(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Accepts numbers, numeric strings and null. Anything unparseable is 0.
fn deserialize_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let value = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(sanitize_value(value))
}

/// Ids arrive as strings or bare numbers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s.trim().to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid asset id: {other}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// One side of a trade: ordered, no duplicate ids, optionally bound to the
/// league member who would give these assets up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSide {
    pub assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl RosterSide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assets(assets: impl IntoIterator<Item = Asset>) -> Self {
        let mut side = Self::new();
        for asset in assets {
            side.add(asset);
        }
        side
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.iter().any(|a| a.id == asset_id)
    }

    /// Appends `asset` unless its id is already present. Returns whether it
    /// was added.
    pub fn add(&mut self, asset: Asset) -> bool {
        if self.contains(&asset.id) {
            return false;
        }
        self.assets.push(asset);
        true
    }

    pub fn remove(&mut self, asset_id: &str) -> Option<Asset> {
        let index = self.assets.iter().position(|a| a.id == asset_id)?;
        Some(self.assets.remove(index))
    }

    pub fn clear(&mut self) {
        self.assets.clear();
        self.owner_id = None;
    }

    pub fn total(&self) -> f64 {
        self.assets.iter().map(|a| a.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Even,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResult {
    pub total_a: f64,
    pub total_b: f64,
    pub winner: Winner,
    pub diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCandidate {
    #[serde(flatten)]
    pub asset: Asset,
    /// `|value - diff|`; lower is a closer fit.
    pub match_score: f64,
}

/// Suggested additions per side. At most one side is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    #[serde(rename = "A")]
    pub a: Vec<RecommendationCandidate>,
    #[serde(rename = "B")]
    pub b: Vec<RecommendationCandidate>,
}

impl Recommendations {
    pub fn for_side(&self, side: Side) -> &[RecommendationCandidate] {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }
}
