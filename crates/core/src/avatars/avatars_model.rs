use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR_EXTENSION: &str = "jpg";
pub const DEFAULT_PLACEHOLDER_URL: &str = "/default-avatar.png";
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
pub const DEFAULT_AVATAR_CONCURRENCY: usize = 5;

/// How tier 2 decides whether `<slug>.<ext>` already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// Lightweight existence check against the public URL.
    #[default]
    Head,
    /// List objects filtered by the key and look for an exact name match.
    List,
}

impl std::str::FromStr for ProbeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "head" => Ok(ProbeStrategy::Head),
            "list" => Ok(ProbeStrategy::List),
            other => Err(format!("unknown probe strategy '{other}'")),
        }
    }
}

/// Deployment knobs for the avatar pipeline.
#[derive(Debug, Clone)]
pub struct AvatarSettings {
    pub extension: String,
    pub placeholder_url: String,
    pub probe: ProbeStrategy,
    /// Upper bound on concurrent resolutions during batch warming.
    pub concurrency: usize,
    /// When set, slugs whose scrape found nothing are remembered as absent
    /// for this long. Unset means every request retries the full pipeline.
    pub negative_ttl: Option<Duration>,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            extension: DEFAULT_AVATAR_EXTENSION.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            probe: ProbeStrategy::Head,
            concurrency: DEFAULT_AVATAR_CONCURRENCY,
            negative_ttl: None,
        }
    }
}

impl AvatarSettings {
    pub fn object_key(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.extension)
    }
}

/// Downloaded image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// Empty when the host sent no content type.
    pub content_type: String,
}

/// Which tier produced a resolved URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarSource {
    Memory,
    Store,
    Scraped,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResolution {
    pub slug: String,
    pub url: String,
    pub source: AvatarSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmStatus {
    /// Already present in memory or in the object store.
    Cached,
    /// Scraped and uploaded during this run.
    Uploaded,
    Failed,
}

/// Per-slug outcome of a batch warm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmReport {
    pub slug: String,
    pub status: WarmStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<AvatarResolution> for WarmReport {
    fn from(resolution: AvatarResolution) -> Self {
        let status = match resolution.source {
            AvatarSource::Memory | AvatarSource::Store => WarmStatus::Cached,
            AvatarSource::Scraped => WarmStatus::Uploaded,
            AvatarSource::Placeholder => WarmStatus::Failed,
        };
        let url = (status != WarmStatus::Failed).then_some(resolution.url);
        WarmReport {
            slug: resolution.slug,
            status,
            url,
            reason: resolution.failure,
        }
    }
}
