use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use rosterhub_core::avatars::{WarmReport, WarmStatus};
use rosterhub_core::errors::{Error as CoreError, SourceError};
use rosterhub_core::valuations::ValueFormat;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    main_lib::AppState,
};

/// Redirects to the player's avatar, or to the placeholder when none can be
/// found. Never errors.
async fn get_avatar(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Redirect {
    let url = state.avatar_service.resolve_avatar(&name).await;
    Redirect::temporary(&url)
}

#[derive(Deserialize)]
struct BatchRequest {
    #[serde(default, alias = "slugs")]
    names: Vec<String>,
}

async fn warm_batch(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<BatchRequest>,
) -> ApiResult<Json<Vec<WarmReport>>> {
    let names: Vec<String> = payload
        .names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .collect();
    if names.is_empty() {
        return Err(ApiError::BadRequest("No names provided".to_string()));
    }
    Ok(Json(state.avatar_service.warm_avatars(names).await))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WarmSummary {
    /// Formats whose valuations were loaded.
    formats: Vec<String>,
    requested: usize,
    cached: usize,
    uploaded: usize,
    failed: Vec<WarmReport>,
}

/// Warms avatars for every player valued in any format. Formats whose
/// valuations cannot be loaded are skipped.
async fn warm_valued(State(state): State<Arc<AppState>>) -> ApiResult<Json<WarmSummary>> {
    let mut formats = Vec::new();
    let mut names = Vec::new();
    for format in ValueFormat::all() {
        match state.valuation_service.get_values(format).await {
            Ok(snapshot) => {
                formats.push(format.to_string());
                names.extend(
                    snapshot
                        .assets
                        .iter()
                        .filter(|a| !a.is_pick())
                        .map(|a| a.display_name.clone()),
                );
            }
            Err(e) => tracing::warn!("Skipping {} valuations for avatar warm: {}", format, e),
        }
    }
    if formats.is_empty() {
        return Err(CoreError::from(SourceError::Unavailable {
            service: "VALUATIONS".to_string(),
            message: "no format could be loaded".to_string(),
        })
        .into());
    }

    let reports = state.avatar_service.warm_avatars(names).await;
    let count = |status: WarmStatus| reports.iter().filter(|r| r.status == status).count();
    let summary = WarmSummary {
        formats,
        requested: reports.len(),
        cached: count(WarmStatus::Cached),
        uploaded: count(WarmStatus::Uploaded),
        failed: reports
            .iter()
            .filter(|r| r.status == WarmStatus::Failed)
            .cloned()
            .collect(),
    };
    tracing::info!(
        "Warmed {} avatars across {} formats: {} cached, {} uploaded, {} failed",
        summary.requested,
        summary.formats.len(),
        summary.cached,
        summary.uploaded,
        summary.failed.len()
    );
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/avatars/batch", post(warm_batch))
        .route("/avatars/warm", post(warm_valued))
        .route("/avatars/{name}", get(get_avatar))
}
