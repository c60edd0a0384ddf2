use serde::{Deserialize, Deserializer};
use serde_json::Value;

use rosterhub_core::trade::Asset;

/// One row of `/values/current`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FantasyCalcEntry {
    #[serde(default)]
    pub player: Option<FantasyCalcPlayer>,
    #[serde(default)]
    pub value: Option<f64>,
    /// Set on synthetic rookie pick rows instead of `player`.
    #[serde(default)]
    pub pick: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FantasyCalcPlayer {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub sleeper_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub maybe_team: Option<String>,
}

/// Ids arrive as numbers or strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl FantasyCalcEntry {
    /// Maps the row to an asset, preferring the platform id. Rows with no
    /// usable id are dropped.
    pub fn into_asset(self) -> Option<Asset> {
        let value = self.value.unwrap_or(0.0);
        match self.player {
            Some(player) => {
                let id = player.sleeper_id.or(player.id)?;
                let asset = Asset::new(
                    id,
                    player.name.unwrap_or_default(),
                    player.position.unwrap_or_default(),
                    value,
                );
                Some(match player.maybe_team {
                    Some(team) => asset.with_team(team),
                    None => asset,
                })
            }
            None => {
                let pick = self.pick?;
                Some(Asset::draft_pick(pick, value))
            }
        }
    }
}
