use async_trait::async_trait;

use crate::errors::Result;

use super::players_model::PlayerRecord;

/// Persistence for the player directory.
#[async_trait]
pub trait PlayerRepositoryTrait: Send + Sync {
    fn get_all(&self) -> Result<Vec<PlayerRecord>>;

    /// Records for the given ids. Unknown ids are skipped.
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<PlayerRecord>>;

    /// Case-insensitive substring match on the name.
    fn search(&self, query: &str, limit: i64) -> Result<Vec<PlayerRecord>>;

    fn count(&self) -> Result<i64>;

    /// Inserts or replaces records by id. Returns the number written.
    async fn upsert_all(&self, records: Vec<PlayerRecord>) -> Result<usize>;
}

#[async_trait]
pub trait PlayerServiceTrait: Send + Sync {
    fn search(&self, query: &str, limit: i64) -> Result<Vec<PlayerRecord>>;

    /// Upserts the platform's player list into the directory. Rows the
    /// platform no longer lists are kept. Returns the number written.
    async fn sync_from_platform(&self) -> Result<usize>;
}
