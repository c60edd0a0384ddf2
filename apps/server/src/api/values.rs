use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rosterhub_core::errors::Result as CoreResult;
use rosterhub_core::trade::Asset;
use rosterhub_core::valuations::ValueFormat;
use serde::{Deserialize, Serialize};

use crate::{
    api::API_PREFIX,
    error::{ApiQuery, ApiResult},
    main_lib::AppState,
};

/// `?format=dynasty|redraft&superflex=true`. Format defaults to dynasty.
#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
    pub superflex: Option<String>,
}

pub(crate) fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1")
    )
}

pub(crate) fn resolve_format(format: Option<&str>, superflex: bool) -> CoreResult<ValueFormat> {
    match format.map(str::trim).filter(|f| !f.is_empty()) {
        Some(format) => ValueFormat::parse(format, superflex),
        None => Ok(ValueFormat::new(true, superflex)),
    }
}

impl FormatQuery {
    pub fn value_format(&self) -> CoreResult<ValueFormat> {
        resolve_format(
            self.format.as_deref(),
            parse_flag(self.superflex.as_deref()),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValuedAsset {
    #[serde(flatten)]
    asset: Asset,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValuesResponse {
    format: String,
    fetched_at: DateTime<Utc>,
    assets: Vec<ValuedAsset>,
}

async fn get_values(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<FormatQuery>,
) -> ApiResult<Json<ValuesResponse>> {
    let format = query.value_format()?;
    let snapshot = state.valuation_service.get_values(format).await?;

    let assets = snapshot
        .assets
        .iter()
        .map(|asset| ValuedAsset {
            avatar_url: (!asset.is_pick()).then(|| {
                format!(
                    "{}/avatars/{}",
                    API_PREFIX,
                    state.avatar_service.slug_for(&asset.display_name)
                )
            }),
            asset: asset.clone(),
        })
        .collect();

    Ok(Json(ValuesResponse {
        format: format.to_string(),
        fetched_at: snapshot.fetched_at,
        assets,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/values", get(get_values))
}
