//! FantasyCalc valuation client.

mod fantasycalc_model;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use rosterhub_core::errors::Result;
use rosterhub_core::trade::Asset;
use rosterhub_core::valuations::{ValuationSource, ValueFormat};

use crate::http::{build_client, get_json, trim_base, CLIENT_USER_AGENT, DEFAULT_TIMEOUT};

pub use fantasycalc_model::{FantasyCalcEntry, FantasyCalcPlayer};

pub const DEFAULT_FANTASYCALC_BASE_URL: &str = "https://api.fantasycalc.com";

/// Every request asks for 12-team full-PPR values.
const NUM_TEAMS: u8 = 12;
const PPR: u8 = 1;

const SERVICE: &str = "FANTASYCALC";

pub struct FantasyCalcClient {
    client: Client,
    base_url: String,
}

impl FantasyCalcClient {
    pub fn new(base_url: Option<&str>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: Option<&str>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout, CLIENT_USER_AGENT),
            base_url: trim_base(base_url.unwrap_or(DEFAULT_FANTASYCALC_BASE_URL)),
        }
    }

    pub fn values_url(&self, format: ValueFormat) -> String {
        format!(
            "{}/values/current?isDynasty={}&numQbs={}&numTeams={}&ppr={}",
            self.base_url,
            format.dynasty,
            format.num_qbs(),
            NUM_TEAMS,
            PPR
        )
    }
}

#[async_trait]
impl ValuationSource for FantasyCalcClient {
    async fn fetch_values(&self, format: ValueFormat) -> Result<Vec<Asset>> {
        let url = self.values_url(format);
        debug!("Fetching {} values from {}", format, url);

        let entries: Vec<FantasyCalcEntry> = get_json(&self.client, SERVICE, &url, None).await?;
        let total = entries.len();
        let assets: Vec<Asset> = entries
            .into_iter()
            .filter_map(FantasyCalcEntry::into_asset)
            .collect();

        info!("Fetched {} {} values ({} usable)", total, format, assets.len());
        Ok(assets)
    }
}
