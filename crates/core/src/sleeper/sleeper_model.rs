use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::trade::OwnerHoldings;

pub const IN_SEASON: &str = "in_season";
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";
pub const UNKNOWN_POSITION: &str = "?";

/// Season used when a request does not name one.
pub fn current_season() -> i32 {
    Utc::now().year()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSettings {
    #[serde(default)]
    pub best_ball: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: LeagueSettings,
}

impl League {
    pub fn is_best_ball(&self) -> bool {
        self.settings.best_ball == Some(1)
    }

    pub fn is_in_season(&self) -> bool {
        self.status == IN_SEASON
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub roster_id: i64,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters: Vec<String>,
}

impl Roster {
    pub fn holds(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p == player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueMember {
    #[serde(alias = "user_id")]
    pub user_id: String,
    #[serde(default, alias = "display_name")]
    pub display_name: Option<String>,
}

/// Which leagues a report covers. In-season leagues only, optionally narrowed
/// by best-ball setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueFilter {
    pub only_best_ball: bool,
    pub exclude_best_ball: bool,
}

impl LeagueFilter {
    pub fn matches(&self, league: &League) -> bool {
        if !league.is_in_season() {
            return false;
        }
        let best_ball = league.is_best_ball();
        !(self.only_best_ball && !best_ball) && !(self.exclude_best_ball && best_ball)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureLeague {
    pub id: String,
    pub name: String,
    pub is_starter: bool,
}

/// How many of a user's leagues roster one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerExposure {
    pub id: String,
    pub name: String,
    pub pos: String,
    pub count: usize,
    pub leagues: Vec<ExposureLeague>,
    /// Starting in at least one league.
    pub is_starter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStockReport {
    pub username: String,
    pub league_count: usize,
    pub players: Vec<PlayerExposure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSummary {
    pub id: String,
    pub name: String,
}

impl From<&League> for LeagueSummary {
    fn from(league: &League) -> Self {
        Self {
            id: league.league_id.clone(),
            name: league.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub username: String,
    pub player_id: String,
    pub player_name: String,
    pub league_count: usize,
    /// Leagues where no roster holds the player.
    pub available_in: Vec<LeagueSummary>,
}

/// League members and what each one rosters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueHoldings {
    pub league_id: String,
    pub members: Vec<LeagueMember>,
    pub rosters: OwnerHoldings,
}
