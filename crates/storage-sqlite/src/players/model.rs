//! Database model for the player directory.

use diesel::prelude::*;
use rosterhub_core::players::PlayerRecord;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::sleeper_player)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct PlayerDB {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
}

impl From<PlayerDB> for PlayerRecord {
    fn from(db: PlayerDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            position: db.position,
        }
    }
}

impl From<PlayerRecord> for PlayerDB {
    fn from(record: PlayerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            position: record.position,
        }
    }
}
