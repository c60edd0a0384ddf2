use async_trait::async_trait;

use crate::errors::Result;

use super::avatars_model::{AvatarResolution, FetchedImage, WarmReport};

/// Durable image storage (tier 2).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Cheap existence check for a single key.
    async fn probe_exists(&self, key: &str) -> Result<bool>;

    /// Names of objects matching `key` as a search term. Callers look for an
    /// exact match in the result.
    async fn list_by_key(&self, key: &str) -> Result<Vec<String>>;

    /// Public URL of `key`. Pure string construction.
    fn public_url(&self, key: &str) -> String;

    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        overwrite: bool,
    ) -> Result<()>;
}

/// HTTP fetching used by the scrape fallback.
///
/// Implementations report a non-success status as
/// [`crate::errors::SourceError::NotFound`] and transport failures as
/// [`crate::errors::SourceError::Unavailable`] or `Timeout`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage>;
}

/// Rewrites image-host URLs into their canonical full-size form.
pub trait ImageUrlNormalizer: Send + Sync {
    fn applies_to(&self, url: &str) -> bool;

    fn normalize(&self, url: &str) -> String;
}

#[async_trait]
pub trait AvatarServiceTrait: Send + Sync {
    /// Storage slug for a display name.
    fn slug_for(&self, name: &str) -> String;

    /// Resolves a display name to an image URL. Never fails: every error
    /// collapses to the placeholder URL.
    async fn resolve_avatar(&self, name: &str) -> String;

    /// Like `resolve_avatar`, also reporting which tier answered.
    async fn resolve_detailed(&self, name: &str) -> AvatarResolution;

    /// Resolves every distinct slug among `names` with bounded concurrency.
    async fn warm_avatars(&self, names: Vec<String>) -> Vec<WarmReport>;

    fn placeholder_url(&self) -> &str;
}
