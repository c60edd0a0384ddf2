use async_trait::async_trait;

use crate::errors::Result;
use crate::players::PlayerRecord;

use super::sleeper_model::{
    AvailabilityReport, League, LeagueFilter, LeagueHoldings, LeagueMember, PlayerStockReport,
    Roster, SleeperUser,
};

/// Read-only platform API.
///
/// An unknown username surfaces as [`crate::Error::NotFound`].
#[async_trait]
pub trait SleeperApi: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<SleeperUser>;

    async fn get_leagues(&self, user_id: &str, season: i32) -> Result<Vec<League>>;

    async fn get_rosters(&self, league_id: &str) -> Result<Vec<Roster>>;

    async fn get_league_users(&self, league_id: &str) -> Result<Vec<LeagueMember>>;

    /// Every player with a full name.
    async fn get_players(&self) -> Result<Vec<PlayerRecord>>;
}

#[async_trait]
pub trait SleeperServiceTrait: Send + Sync {
    /// A user's leagues for `season`, optionally filtered.
    async fn user_leagues(
        &self,
        username: &str,
        season: i32,
        filter: Option<LeagueFilter>,
    ) -> Result<(SleeperUser, Vec<League>)>;

    async fn player_stock(
        &self,
        username: &str,
        filter: LeagueFilter,
        season: i32,
    ) -> Result<PlayerStockReport>;

    async fn availability(
        &self,
        username: &str,
        player_id: &str,
        filter: LeagueFilter,
        season: i32,
    ) -> Result<AvailabilityReport>;

    async fn league_holdings(&self, league_id: &str) -> Result<LeagueHoldings>;
}
