//! Fantasy platform (Sleeper) lookups: users, leagues, rosters, and the
//! reports built on them.

mod sleeper_model;
mod sleeper_service;
mod sleeper_traits;


pub use sleeper_model::{
    current_season, AvailabilityReport, ExposureLeague, League, LeagueFilter, LeagueHoldings,
    LeagueMember, LeagueSettings, LeagueSummary, PlayerExposure, PlayerStockReport, Roster,
    SleeperUser, IN_SEASON, UNKNOWN_PLAYER_NAME, UNKNOWN_POSITION,
};
pub use sleeper_service::{SleeperService, DEFAULT_ROSTER_CONCURRENCY};
pub use sleeper_traits::{SleeperApi, SleeperServiceTrait};
