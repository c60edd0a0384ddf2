//! Background scheduler for periodic data refresh.
//!
//! Runs a fixed 24-hour interval that refreshes every valuation format and
//! the local player directory.

use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Refresh interval: 24 hours.
const REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Initial delay before the first refresh (30 seconds to let the server start).
const INITIAL_DELAY_SECS: u64 = 30;

pub fn start_refresh_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Refresh scheduler started (24-hour interval)");

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        // The first tick completes immediately.
        let mut refresh_interval = interval(Duration::from_secs(REFRESH_INTERVAL_SECS));
        loop {
            refresh_interval.tick().await;
            run_scheduled_refresh(&state).await;
        }
    });
}

/// Runs a single refresh. Failures are logged and retried on the next tick.
pub async fn run_scheduled_refresh(state: &AppState) {
    info!("Running scheduled refresh...");

    let refreshed = state.valuation_service.refresh_all().await;
    info!("Refreshed {} valuation formats", refreshed);

    match state.player_service.sync_from_platform().await {
        Ok(count) => info!("Player directory synced: {} players", count),
        Err(e) => warn!("Player directory sync failed: {}", e),
    }
}
