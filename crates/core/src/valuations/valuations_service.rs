use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::Result;
use crate::trade::active_pool;

use super::valuations_model::{ValuationSnapshot, ValueFormat};
use super::valuations_traits::{ValuationServiceTrait, ValuationSource};

struct CachedSnapshot {
    snapshot: Arc<ValuationSnapshot>,
    loaded_at: Instant,
}

pub struct ValuationService {
    source: Arc<dyn ValuationSource>,
    ttl: Duration,
    cache: RwLock<HashMap<ValueFormat, CachedSnapshot>>,
}

impl ValuationService {
    pub fn new(source: Arc<dyn ValuationSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    async fn fresh_cached(&self, format: ValueFormat) -> Option<Arc<ValuationSnapshot>> {
        let cache = self.cache.read().await;
        cache
            .get(&format)
            .filter(|entry| entry.loaded_at.elapsed() < self.ttl)
            .map(|entry| entry.snapshot.clone())
    }

    async fn any_cached(&self, format: ValueFormat) -> Option<Arc<ValuationSnapshot>> {
        let cache = self.cache.read().await;
        cache.get(&format).map(|entry| entry.snapshot.clone())
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn get_values(&self, format: ValueFormat) -> Result<Arc<ValuationSnapshot>> {
        if let Some(snapshot) = self.fresh_cached(format).await {
            debug!("Valuation cache hit for {}", format);
            return Ok(snapshot);
        }

        match self.refresh(format).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => match self.any_cached(format).await {
                Some(stale) => {
                    warn!("Serving stale {} values after refresh failure: {}", format, err);
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    async fn refresh(&self, format: ValueFormat) -> Result<Arc<ValuationSnapshot>> {
        let raw = self.source.fetch_values(format).await?;
        let fetched = raw.len();
        let snapshot = Arc::new(ValuationSnapshot {
            format,
            fetched_at: Utc::now(),
            assets: active_pool(raw),
        });
        info!(
            "Loaded {} active {} values ({} fetched)",
            snapshot.assets.len(),
            format,
            fetched
        );

        self.cache.write().await.insert(
            format,
            CachedSnapshot {
                snapshot: snapshot.clone(),
                loaded_at: Instant::now(),
            },
        );
        Ok(snapshot)
    }

    async fn refresh_all(&self) -> usize {
        let mut refreshed = 0;
        for format in ValueFormat::all() {
            match self.refresh(format).await {
                Ok(_) => refreshed += 1,
                Err(e) => warn!("Failed to refresh {} values: {}", format, e),
            }
        }
        refreshed
    }
}
