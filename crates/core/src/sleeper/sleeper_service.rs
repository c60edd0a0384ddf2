use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info};

use crate::errors::{Result, ValidationError};
use crate::players::PlayerRepositoryTrait;
use crate::trade::OwnerHoldings;

use super::sleeper_model::{
    AvailabilityReport, ExposureLeague, League, LeagueFilter, LeagueHoldings, LeagueSummary,
    PlayerExposure, PlayerStockReport, Roster, SleeperUser, UNKNOWN_PLAYER_NAME,
    UNKNOWN_POSITION,
};
use super::sleeper_traits::{SleeperApi, SleeperServiceTrait};

pub const DEFAULT_ROSTER_CONCURRENCY: usize = 5;

pub struct SleeperService {
    api: Arc<dyn SleeperApi>,
    players: Arc<dyn PlayerRepositoryTrait>,
    concurrency: usize,
}

impl SleeperService {
    pub fn new(api: Arc<dyn SleeperApi>, players: Arc<dyn PlayerRepositoryTrait>) -> Self {
        Self {
            api,
            players,
            concurrency: DEFAULT_ROSTER_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Rosters for each league, in league order.
    async fn rosters_for(&self, leagues: &[League]) -> Result<Vec<Vec<Roster>>> {
        let futures: Vec<_> = leagues
            .iter()
            .map(|league| self.api.get_rosters(&league.league_id))
            .collect();
        let results: Vec<Result<Vec<Roster>>> = stream::iter(futures)
            .buffered(self.concurrency)
            .collect()
            .await;
        results.into_iter().collect()
    }

    /// Directory lookup for ids; missing entries are left out of the map.
    fn names_for(&self, ids: &[String]) -> Result<HashMap<String, (String, Option<String>)>> {
        Ok(self
            .players
            .get_by_ids(ids)?
            .into_iter()
            .map(|p| (p.id, (p.name, p.position)))
            .collect())
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(())
}

#[async_trait]
impl SleeperServiceTrait for SleeperService {
    async fn user_leagues(
        &self,
        username: &str,
        season: i32,
        filter: Option<LeagueFilter>,
    ) -> Result<(SleeperUser, Vec<League>)> {
        require(username, "username")?;
        let user = self.api.get_user(username.trim()).await?;
        let mut leagues = self.api.get_leagues(&user.user_id, season).await?;
        if let Some(filter) = filter {
            leagues.retain(|league| filter.matches(league));
        }
        debug!(
            "User '{}' has {} matching leagues in {}",
            username,
            leagues.len(),
            season
        );
        Ok((user, leagues))
    }

    async fn player_stock(
        &self,
        username: &str,
        filter: LeagueFilter,
        season: i32,
    ) -> Result<PlayerStockReport> {
        let (user, leagues) = self.user_leagues(username, season, Some(filter)).await?;
        let rosters = self.rosters_for(&leagues).await?;

        // Player ids in first-seen order, with the leagues they appear in.
        let mut order: Vec<String> = Vec::new();
        let mut appearances: HashMap<String, Vec<ExposureLeague>> = HashMap::new();

        for (league, league_rosters) in leagues.iter().zip(rosters) {
            let Some(mine) = league_rosters
                .into_iter()
                .find(|r| r.owner_id.as_deref() == Some(user.user_id.as_str()))
            else {
                continue;
            };

            for player_id in &mine.players {
                let entry = appearances.entry(player_id.clone()).or_insert_with(|| {
                    order.push(player_id.clone());
                    Vec::new()
                });
                entry.push(ExposureLeague {
                    id: league.league_id.clone(),
                    name: league.name.clone(),
                    is_starter: mine.starters.contains(player_id),
                });
            }
        }

        let names = self.names_for(&order)?;
        let mut players: Vec<PlayerExposure> = order
            .into_iter()
            .map(|id| {
                let leagues = appearances.remove(&id).unwrap_or_default();
                let (name, pos) = match names.get(&id) {
                    Some((name, pos)) => (
                        name.clone(),
                        pos.clone().unwrap_or_else(|| UNKNOWN_POSITION.to_string()),
                    ),
                    None => (UNKNOWN_PLAYER_NAME.to_string(), UNKNOWN_POSITION.to_string()),
                };
                PlayerExposure {
                    count: leagues.len(),
                    is_starter: leagues.iter().any(|l| l.is_starter),
                    id,
                    name,
                    pos,
                    leagues,
                }
            })
            .collect();
        players.sort_by(|a, b| b.count.cmp(&a.count));

        info!(
            "Player stock for '{}': {} players across {} leagues",
            username,
            players.len(),
            leagues.len()
        );

        Ok(PlayerStockReport {
            username: username.to_string(),
            league_count: leagues.len(),
            players,
        })
    }

    async fn availability(
        &self,
        username: &str,
        player_id: &str,
        filter: LeagueFilter,
        season: i32,
    ) -> Result<AvailabilityReport> {
        require(player_id, "player_id")?;
        let (_, leagues) = self.user_leagues(username, season, Some(filter)).await?;
        let rosters = self.rosters_for(&leagues).await?;

        let available_in: Vec<LeagueSummary> = leagues
            .iter()
            .zip(rosters)
            .filter(|(_, league_rosters)| !league_rosters.iter().any(|r| r.holds(player_id)))
            .map(|(league, _)| LeagueSummary::from(league))
            .collect();

        let player_name = self
            .names_for(&[player_id.to_string()])?
            .remove(player_id)
            .map(|(name, _)| name)
            .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string());

        Ok(AvailabilityReport {
            username: username.to_string(),
            player_id: player_id.to_string(),
            player_name,
            league_count: leagues.len(),
            available_in,
        })
    }

    async fn league_holdings(&self, league_id: &str) -> Result<LeagueHoldings> {
        require(league_id, "league_id")?;
        let members = self.api.get_league_users(league_id).await?;
        let rosters = self.api.get_rosters(league_id).await?;

        let mut holdings = OwnerHoldings::new();
        for roster in rosters {
            if let Some(owner) = roster.owner_id {
                holdings.entry(owner).or_default().extend(roster.players);
            }
        }

        Ok(LeagueHoldings {
            league_id: league_id.to_string(),
            members,
            rosters: holdings,
        })
    }
}
