use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::errors::{Result, ValidationError};
use crate::sleeper::SleeperApi;

use super::players_model::PlayerRecord;
use super::players_traits::{PlayerRepositoryTrait, PlayerServiceTrait};

pub const MAX_SEARCH_LIMIT: i64 = 100;

pub struct PlayerService {
    repository: Arc<dyn PlayerRepositoryTrait>,
    api: Arc<dyn SleeperApi>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepositoryTrait>, api: Arc<dyn SleeperApi>) -> Self {
        Self { repository, api }
    }
}

#[async_trait]
impl PlayerServiceTrait for PlayerService {
    fn search(&self, query: &str, limit: i64) -> Result<Vec<PlayerRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::MissingField("q".to_string()).into());
        }
        self.repository
            .search(query, limit.clamp(1, MAX_SEARCH_LIMIT))
    }

    async fn sync_from_platform(&self) -> Result<usize> {
        let players: Vec<PlayerRecord> = self
            .api
            .get_players()
            .await?
            .into_iter()
            .filter(|p| !p.name.trim().is_empty())
            .collect();
        let written = self.repository.upsert_all(players).await?;
        info!("Synced {} players into the directory", written);
        Ok(written)
    }
}
