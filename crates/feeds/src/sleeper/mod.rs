//! Sleeper public API client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use rosterhub_core::errors::{Error, Result};
use rosterhub_core::players::PlayerRecord;
use rosterhub_core::sleeper::{League, LeagueMember, Roster, SleeperApi, SleeperUser};

use crate::errors::FeedError;
use crate::http::{
    build_client, endpoint, get_json, trim_base, CLIENT_USER_AGENT, DEFAULT_TIMEOUT,
};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

pub const DEFAULT_SLEEPER_BASE_URL: &str = "https://api.sleeper.app/v1";

const SERVICE: &str = "SLEEPER";

/// The full player dump is several megabytes.
const PLAYERS_TIMEOUT: Duration = Duration::from_secs(60);

/// Entry of the `/players/nfl` map. Only the fields the directory keeps.
#[derive(Debug, Deserialize)]
struct SleeperPlayer {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    position: Option<String>,
}

pub struct SleeperClient {
    client: Client,
    bulk_client: Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl SleeperClient {
    pub fn new(base_url: Option<&str>) -> Self {
        Self::with_config(base_url, DEFAULT_TIMEOUT, RateLimitConfig::default())
    }

    pub fn with_config(base_url: Option<&str>, timeout: Duration, limits: RateLimitConfig) -> Self {
        Self {
            client: build_client(timeout, CLIENT_USER_AGENT),
            bulk_client: build_client(PLAYERS_TIMEOUT.max(timeout), CLIENT_USER_AGENT),
            base_url: trim_base(base_url.unwrap_or(DEFAULT_SLEEPER_BASE_URL)),
            limiter: Arc::new(RateLimiter::new(SERVICE, limits)),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        client: &Client,
        segments: &[&str],
    ) -> std::result::Result<T, FeedError> {
        let url = endpoint(SERVICE, &self.base_url, segments)?;
        debug!("GET {}", url);
        get_json(client, SERVICE, &url, Some(&self.limiter)).await
    }
}

#[async_trait]
impl SleeperApi for SleeperClient {
    async fn get_user(&self, username: &str) -> Result<SleeperUser> {
        // Unknown usernames come back as a 200 with a `null` body.
        let user: Option<SleeperUser> = self
            .get(&self.client, &["user", username.trim()])
            .await
            .map_err(|e| match e {
                FeedError::NotFound { .. } => Error::NotFound(format!("user '{username}'")),
                other => other.into(),
            })?;
        user.ok_or_else(|| Error::NotFound(format!("user '{username}'")))
    }

    async fn get_leagues(&self, user_id: &str, season: i32) -> Result<Vec<League>> {
        let season = season.to_string();
        let leagues: Option<Vec<League>> = self
            .get(&self.client, &["user", user_id, "leagues", "nfl", season.as_str()])
            .await?;
        Ok(leagues.unwrap_or_default())
    }

    async fn get_rosters(&self, league_id: &str) -> Result<Vec<Roster>> {
        let rosters: Option<Vec<Roster>> =
            self.get(&self.client, &["league", league_id, "rosters"]).await?;
        Ok(rosters.unwrap_or_default())
    }

    async fn get_league_users(&self, league_id: &str) -> Result<Vec<LeagueMember>> {
        let members: Option<Vec<LeagueMember>> =
            self.get(&self.client, &["league", league_id, "users"]).await?;
        Ok(members.unwrap_or_default())
    }

    async fn get_players(&self) -> Result<Vec<PlayerRecord>> {
        let players: HashMap<String, SleeperPlayer> =
            self.get(&self.bulk_client, &["players", "nfl"]).await?;

        let mut records: Vec<PlayerRecord> = players
            .into_iter()
            .filter_map(|(id, player)| {
                let name = player.full_name?.trim().to_string();
                (!name.is_empty()).then(|| PlayerRecord::new(id, name, player.position.as_deref()))
            })
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));

        info!("Fetched {} named players from Sleeper", records.len());
        Ok(records)
    }
}
