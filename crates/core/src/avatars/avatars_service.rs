use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::slug::SlugNormalizer;

use super::avatar_cache::{AvatarCache, CacheLookup};
use super::avatars_errors::AvatarError;
use super::avatars_model::{
    AvatarResolution, AvatarSettings, AvatarSource, ProbeStrategy, WarmReport,
};
use super::avatars_traits::{AvatarServiceTrait, ObjectStore};
use super::profile_scraper::ProfileScraper;

/// Composes slug normalization, the two cache tiers and the scrape fallback.
pub struct AvatarService {
    normalizer: Arc<SlugNormalizer>,
    cache: Arc<AvatarCache>,
    store: Arc<dyn ObjectStore>,
    scraper: ProfileScraper,
    settings: AvatarSettings,
}

impl AvatarService {
    pub fn new(
        normalizer: Arc<SlugNormalizer>,
        cache: Arc<AvatarCache>,
        store: Arc<dyn ObjectStore>,
        scraper: ProfileScraper,
        settings: AvatarSettings,
    ) -> Self {
        Self {
            normalizer,
            cache,
            store,
            scraper,
            settings,
        }
    }

    pub fn settings(&self) -> &AvatarSettings {
        &self.settings
    }

    /// Runs the pipeline for an already normalized slug.
    pub async fn resolve_slug(&self, slug: &str) -> AvatarResolution {
        if slug.is_empty() {
            return self.placeholder(slug, Some("empty slug".to_string()));
        }

        match self.cache.get(slug) {
            CacheLookup::Hit(url) => {
                return AvatarResolution {
                    slug: slug.to_string(),
                    url,
                    source: AvatarSource::Memory,
                    failure: None,
                };
            }
            CacheLookup::KnownAbsent => {
                return self.placeholder(slug, Some("recently not found".to_string()));
            }
            CacheLookup::Miss => {}
        }

        let key = self.settings.object_key(slug);
        if let Some(url) = self.probe_store(&key).await {
            self.cache.insert(slug, url.clone());
            return AvatarResolution {
                slug: slug.to_string(),
                url,
                source: AvatarSource::Store,
                failure: None,
            };
        }

        match self.scraper.scrape_and_store(slug, &key).await {
            Ok(url) => {
                info!("Stored avatar for '{}' at {}", slug, url);
                self.cache.insert(slug, url.clone());
                AvatarResolution {
                    slug: slug.to_string(),
                    url,
                    source: AvatarSource::Scraped,
                    failure: None,
                }
            }
            Err(err) => {
                warn!("Avatar resolution for '{}' failed: {}", slug, err);
                if let (Some(ttl), AvatarError::NotFound(_)) = (self.settings.negative_ttl, &err) {
                    self.cache.mark_absent(slug, ttl);
                }
                self.placeholder(slug, Some(err.to_string()))
            }
        }
    }

    /// Tier 2. Any probe error counts as a miss.
    async fn probe_store(&self, key: &str) -> Option<String> {
        let found = match self.settings.probe {
            ProbeStrategy::Head => self.store.probe_exists(key).await,
            ProbeStrategy::List => self
                .store
                .list_by_key(key)
                .await
                .map(|names| names.iter().any(|name| name == key)),
        };

        match found {
            Ok(true) => Some(self.store.public_url(key)),
            Ok(false) => None,
            Err(e) => {
                debug!("Object store probe for '{}' failed, treating as miss: {}", key, e);
                None
            }
        }
    }

    fn placeholder(&self, slug: &str, failure: Option<String>) -> AvatarResolution {
        AvatarResolution {
            slug: slug.to_string(),
            url: self.settings.placeholder_url.clone(),
            source: AvatarSource::Placeholder,
            failure,
        }
    }
}

#[async_trait]
impl AvatarServiceTrait for AvatarService {
    fn slug_for(&self, name: &str) -> String {
        self.normalizer.normalize(name)
    }

    async fn resolve_avatar(&self, name: &str) -> String {
        self.resolve_detailed(name).await.url
    }

    async fn resolve_detailed(&self, name: &str) -> AvatarResolution {
        let slug = self.normalizer.normalize(name);
        self.resolve_slug(&slug).await
    }

    async fn warm_avatars(&self, names: Vec<String>) -> Vec<WarmReport> {
        let mut seen = HashSet::new();
        let slugs: Vec<String> = names
            .iter()
            .map(|name| self.normalizer.normalize(name))
            .filter(|slug| !slug.is_empty() && seen.insert(slug.clone()))
            .collect();

        info!(
            "Warming {} avatars ({} names) with concurrency {}",
            slugs.len(),
            names.len(),
            self.settings.concurrency
        );

        stream::iter(slugs)
            .map(|slug| async move { WarmReport::from(self.resolve_slug(&slug).await) })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await
    }

    fn placeholder_url(&self) -> &str {
        &self.settings.placeholder_url
    }
}
