use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use rosterhub_core::sleeper::{LeagueHoldings, LeagueSummary};
use serde::Serialize;

use crate::{
    api::reports::{required, UserQuery},
    error::{ApiQuery, ApiResult},
    main_lib::AppState,
};

async fn get_holdings(
    State(state): State<Arc<AppState>>,
    Path(league_id): Path<String>,
) -> ApiResult<Json<LeagueHoldings>> {
    Ok(Json(state.sleeper_service.league_holdings(&league_id).await?))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserLeagues {
    user_id: String,
    username: String,
    season: i32,
    leagues: Vec<LeagueSummary>,
}

/// A user's in-season leagues, for picking a trade context.
async fn list_leagues(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<UserLeagues>> {
    let username = required(&query.username, "No username provided.")?;
    let season = query.season();

    let (user, leagues) = state
        .sleeper_service
        .user_leagues(username, season, Some(query.league_filter()))
        .await?;

    Ok(Json(UserLeagues {
        user_id: user.user_id,
        username: username.to_string(),
        season,
        leagues: leagues.iter().map(LeagueSummary::from).collect(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/leagues", get(list_leagues))
        .route("/leagues/{id}/holdings", get(get_holdings))
}
