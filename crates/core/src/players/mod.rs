//! Local player directory (id, name, position), synced from the platform.

mod players_model;
mod players_service;
mod players_traits;

pub use players_model::PlayerRecord;
pub use players_service::PlayerService;
pub use players_traits::{PlayerRepositoryTrait, PlayerServiceTrait};
