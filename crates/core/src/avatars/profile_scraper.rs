use std::sync::Arc;

use log::debug;
use scraper::{Html, Selector};
use url::Url;

use crate::errors::{Error, Result, SourceError, ValidationError};

use super::avatars_errors::AvatarError;
use super::avatars_model::{FetchedImage, DEFAULT_CONTENT_TYPE};
use super::avatars_traits::{ImageUrlNormalizer, ObjectStore, PageFetcher};
use super::url_normalizer::TransformSegmentStripper;

pub const DEFAULT_PROFILE_BASE_URL: &str = "https://www.nfl.com/players";
pub const DEFAULT_AVATAR_SELECTOR: &str = "img.img-responsive";

/// Scrape-on-miss fallback: profile page, first headshot, upload.
pub struct ProfileScraper {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ObjectStore>,
    profile_base_url: String,
    selector: Selector,
    normalizers: Vec<Arc<dyn ImageUrlNormalizer>>,
}

impl ProfileScraper {
    /// Scraper with the default selector and the transform-segment stripper.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn ObjectStore>,
        profile_base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            store,
            profile_base_url: profile_base_url.into().trim_end_matches('/').to_string(),
            selector: parse_selector(DEFAULT_AVATAR_SELECTOR)?,
            normalizers: vec![Arc::new(TransformSegmentStripper::default())],
        })
    }

    pub fn with_selector(mut self, css: &str) -> Result<Self> {
        self.selector = parse_selector(css)?;
        Ok(self)
    }

    /// Adds a URL normalizer. The first one whose `applies_to` matches wins.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn ImageUrlNormalizer>) -> Self {
        self.normalizers.push(normalizer);
        self
    }

    pub fn profile_url(&self, slug: &str) -> String {
        format!("{}/{}/", self.profile_base_url, slug)
    }

    /// `src` of the first element matching the avatar selector.
    pub fn extract_image_src(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.selector)
            .next()
            .and_then(|el| el.value().attr("src"))
            .map(|src| src.trim().to_string())
            .filter(|src| !src.is_empty())
    }

    /// Applies the matching normalizer and requires an absolute https URL.
    pub fn canonical_image_url(&self, raw: &str) -> std::result::Result<String, AvatarError> {
        let normalized = match self.normalizers.iter().find(|n| n.applies_to(raw)) {
            Some(normalizer) => normalizer.normalize(raw),
            None => raw.to_string(),
        };

        match Url::parse(&normalized) {
            Ok(url) if url.scheme() == "https" && url.host().is_some() => Ok(normalized),
            _ => Err(AvatarError::NotFound(format!(
                "image url is not absolute https: {normalized}"
            ))),
        }
    }

    /// Fetches the profile page for `slug`, copies its headshot to `key` and
    /// returns the public URL of the stored copy.
    pub async fn scrape_and_store(
        &self,
        slug: &str,
        key: &str,
    ) -> std::result::Result<String, AvatarError> {
        let page_url = self.profile_url(slug);
        let html = self
            .fetcher
            .fetch_page(&page_url)
            .await
            .map_err(|e| fetch_failure(&page_url, e))?;

        let src = self.extract_image_src(&html).ok_or_else(|| {
            AvatarError::NotFound(format!("no avatar image on {page_url}"))
        })?;
        let image_url = self.canonical_image_url(&src)?;
        debug!("Scraped avatar for '{}': {}", slug, image_url);

        let FetchedImage {
            bytes,
            content_type,
        } = self
            .fetcher
            .fetch_image(&image_url)
            .await
            .map_err(|e| fetch_failure(&image_url, e))?;
        if bytes.is_empty() {
            return Err(AvatarError::NotFound(format!("empty image at {image_url}")));
        }
        let content_type = if content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            content_type.as_str()
        };

        self.store
            .upload(key, bytes, content_type, true)
            .await
            .map_err(|e| AvatarError::UploadFailed(format!("{key}: {e}")))?;

        Ok(self.store.public_url(key))
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "invalid avatar selector '{css}': {e}"
        )))
    })
}

fn fetch_failure(url: &str, err: Error) -> AvatarError {
    match err {
        Error::Source(SourceError::NotFound { .. }) => {
            AvatarError::NotFound(format!("{url} returned no content"))
        }
        other => AvatarError::UpstreamUnavailable(format!("{url}: {other}")),
    }
}
