//! Avatar resolution pipeline.
//!
//! ```text
//!  display name ──► SlugNormalizer ──► slug
//!                                        │
//!            ┌───────────────────────────┼───────────────────────────┐
//!            ▼                           ▼                           ▼
//!      AvatarCache (tier 1)     ObjectStore probe (tier 2)     ProfileScraper
//!      in-process map           <slug>.<ext> exists?           page ─► img ─► upload
//!            │                           │                           │
//!            └─────────────── url ◄──────┴───────────────────────────┘
//!                              (placeholder when everything misses)
//! ```

mod avatar_cache;
mod avatars_errors;
mod avatars_model;
mod avatars_service;
mod avatars_traits;
mod profile_scraper;
mod url_normalizer;

#[cfg(test)]
mod avatars_service_tests;

pub use avatar_cache::{AvatarCache, CacheLookup};
pub use avatars_errors::AvatarError;
pub use avatars_model::{
    AvatarResolution, AvatarSettings, AvatarSource, FetchedImage, ProbeStrategy, WarmReport,
    WarmStatus, DEFAULT_AVATAR_CONCURRENCY, DEFAULT_AVATAR_EXTENSION, DEFAULT_CONTENT_TYPE,
    DEFAULT_PLACEHOLDER_URL,
};
pub use avatars_service::AvatarService;
pub use avatars_traits::{AvatarServiceTrait, ImageUrlNormalizer, ObjectStore, PageFetcher};
pub use profile_scraper::{ProfileScraper, DEFAULT_AVATAR_SELECTOR, DEFAULT_PROFILE_BASE_URL};
pub use url_normalizer::TransformSegmentStripper;
