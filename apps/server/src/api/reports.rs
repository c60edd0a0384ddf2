use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use rosterhub_core::sleeper::{current_season, AvailabilityReport, LeagueFilter, PlayerStockReport};
use serde::Deserialize;

use crate::{
    api::values::parse_flag,
    error::{ApiError, ApiQuery, ApiResult},
    main_lib::AppState,
};

/// Query shared by the per-user reports. Best-ball flags take `1` or `true`.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
    pub player_id: Option<String>,
    pub season: Option<i32>,
    pub only_bestball: Option<String>,
    pub exclude_bestball: Option<String>,
}

impl UserQuery {
    pub fn league_filter(&self) -> LeagueFilter {
        LeagueFilter {
            only_best_ball: parse_flag(self.only_bestball.as_deref()),
            exclude_best_ball: parse_flag(self.exclude_bestball.as_deref()),
        }
    }

    pub fn season(&self) -> i32 {
        self.season.unwrap_or_else(current_season)
    }
}

pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

async fn player_stock(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<PlayerStockReport>> {
    let username = required(&query.username, "No username provided.")?;
    let report = state
        .sleeper_service
        .player_stock(
            username,
            query.league_filter(),
            query.season(),
        )
        .await?;
    Ok(Json(report))
}

async fn player_availability(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<AvailabilityReport>> {
    let username = required(&query.username, "No username provided.")?;
    let player_id = required(&query.player_id, "No player_id provided.")?;
    let report = state
        .sleeper_service
        .availability(
            username,
            player_id,
            query.league_filter(),
            query.season(),
        )
        .await?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/player-stock", get(player_stock))
        .route("/player-availability", get(player_availability))
}
