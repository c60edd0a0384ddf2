use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use rosterhub_core::trade::{Asset, OwnerHoldings, Side, TradeEvaluation, TradeSession};
use rosterhub_core::valuations::ValuationSnapshot;
use serde::{Deserialize, Serialize};

use crate::{
    api::values::resolve_format,
    error::{ApiError, ApiJson, ApiResult},
    main_lib::AppState,
};

/// A side entry is either an asset id from the valuation pool (string or
/// number) or a full asset.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SideEntry {
    Id(String),
    NumericId(serde_json::Number),
    Asset(Asset),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    superflex: bool,
    #[serde(default)]
    side_a: Vec<SideEntry>,
    #[serde(default)]
    side_b: Vec<SideEntry>,
    #[serde(default)]
    owner_a: Option<String>,
    #[serde(default)]
    owner_b: Option<String>,
    /// Loads holdings from the platform. Takes precedence over `holdings`.
    #[serde(default)]
    league_id: Option<String>,
    #[serde(default)]
    holdings: Option<OwnerHoldings>,
    #[serde(default)]
    margin: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResponse {
    format: String,
    side_a: Vec<Asset>,
    side_b: Vec<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_b: Option<String>,
    #[serde(flatten)]
    evaluation: TradeEvaluation,
}

fn resolve_entry(entry: SideEntry, snapshot: &ValuationSnapshot) -> ApiResult<Asset> {
    match entry {
        SideEntry::Asset(asset) => Ok(asset),
        SideEntry::Id(id) => find_asset(id.trim(), snapshot),
        SideEntry::NumericId(id) => find_asset(&id.to_string(), snapshot),
    }
}

fn find_asset(id: &str, snapshot: &ValuationSnapshot) -> ApiResult<Asset> {
    snapshot
        .find(id)
        .cloned()
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown asset id '{id}'")))
}

async fn evaluate_trade(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<EvaluateRequest>,
) -> ApiResult<Json<EvaluateResponse>> {
    let format = resolve_format(payload.format.as_deref(), payload.superflex)?;
    let snapshot = state.valuation_service.get_values(format).await?;

    let holdings = match payload.league_id.as_deref().map(str::trim) {
        Some(league_id) if !league_id.is_empty() => {
            Some(state.sleeper_service.league_holdings(league_id).await?.rosters)
        }
        _ => payload.holdings,
    };

    let mut session = TradeSession::new();
    if let Some(holdings) = holdings {
        session.load_league(holdings);
    }
    session.set_owner(Side::A, payload.owner_a);
    session.set_owner(Side::B, payload.owner_b);

    for (side, entries) in [(Side::A, payload.side_a), (Side::B, payload.side_b)] {
        for entry in entries {
            let asset = resolve_entry(entry, &snapshot)?;
            session.add(side, asset);
        }
    }

    let margin = payload
        .margin
        .filter(|m| m.is_finite() && *m >= 0.0)
        .unwrap_or(state.safe_margin);
    let evaluation = session.evaluate(&snapshot.assets, margin);

    let side_a = session.side(Side::A);
    let side_b = session.side(Side::B);
    Ok(Json(EvaluateResponse {
        format: format.to_string(),
        side_a: side_a.assets.clone(),
        side_b: side_b.assets.clone(),
        owner_a: side_a.owner_id.clone(),
        owner_b: side_b.owner_id.clone(),
        evaluation,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/trade/evaluate", post(evaluate_trade))
}
