use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rosterhub_core::players::{PlayerRecord, PlayerRepositoryTrait};
use rosterhub_core::Result;

use super::model::PlayerDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sleeper_player;
use crate::schema::sleeper_player::dsl::*;

/// SQLite parameter limit headroom for `IN (...)` lists and batch inserts.
const CHUNK_SIZE: usize = 500;

pub struct PlayerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PlayerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PlayerRepository { pool, writer }
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl PlayerRepositoryTrait for PlayerRepository {
    fn get_all(&self) -> Result<Vec<PlayerRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = sleeper_player
            .order(name.asc())
            .select(PlayerDB::as_select())
            .load::<PlayerDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(PlayerRecord::from).collect())
    }

    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<PlayerRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let mut records = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(CHUNK_SIZE) {
            let rows = sleeper_player
                .filter(id.eq_any(chunk))
                .select(PlayerDB::as_select())
                .load::<PlayerDB>(&mut conn)
                .map_err(StorageError::from)?;
            records.extend(rows.into_iter().map(PlayerRecord::from));
        }
        Ok(records)
    }

    fn search(&self, query: &str, limit: i64) -> Result<Vec<PlayerRecord>> {
        let mut conn = get_connection(&self.pool)?;
        // SQLite LIKE is case-insensitive for ASCII.
        let rows = sleeper_player
            .filter(name.like(like_pattern(query.trim())).escape('\\'))
            .order(name.asc())
            .limit(limit)
            .select(PlayerDB::as_select())
            .load::<PlayerDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(PlayerRecord::from).collect())
    }

    fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let total = sleeper_player
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(total)
    }

    async fn upsert_all(&self, records: Vec<PlayerRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<PlayerDB> = records.into_iter().map(PlayerDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for chunk in rows.chunks(CHUNK_SIZE) {
                    written += diesel::replace_into(sleeper_player::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await
    }
}
