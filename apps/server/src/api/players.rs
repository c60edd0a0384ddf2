use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rosterhub_core::players::PlayerRecord;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiQuery, ApiResult},
    main_lib::AppState,
};

const DEFAULT_SEARCH_LIMIT: i64 = 25;

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    limit: Option<i64>,
}

async fn search_players(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<PlayerRecord>>> {
    let players = state
        .player_service
        .search(&query.q, query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))?;
    Ok(Json(players))
}

#[derive(Serialize)]
struct SyncResponse {
    synced: usize,
}

async fn sync_players(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncResponse>> {
    let synced = state.player_service.sync_from_platform().await?;
    tracing::info!("Player directory synced: {} players", synced);
    Ok(Json(SyncResponse { synced }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/players/search", get(search_players))
        .route("/players/sync", post(sync_players))
}
