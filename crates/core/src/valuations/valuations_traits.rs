use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::trade::Asset;

use super::valuations_model::{ValuationSnapshot, ValueFormat};

/// Upstream provider of player values.
#[async_trait]
pub trait ValuationSource: Send + Sync {
    /// Raw values for `format`. May include inactive entries.
    async fn fetch_values(&self, format: ValueFormat) -> Result<Vec<Asset>>;
}

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Cached snapshot for `format`, refreshed once older than the TTL.
    async fn get_values(&self, format: ValueFormat) -> Result<Arc<ValuationSnapshot>>;

    /// Fetches `format` regardless of cache age.
    async fn refresh(&self, format: ValueFormat) -> Result<Arc<ValuationSnapshot>>;

    /// Refreshes every format. Returns how many succeeded.
    async fn refresh_all(&self) -> usize;
}
