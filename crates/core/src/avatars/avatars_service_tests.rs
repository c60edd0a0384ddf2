//! Tests for the avatar pipeline against in-memory collaborators.
//!
//! Covers tier ordering (memory, then store, then scrape), the
//! one-probe/one-upload bound on a miss, and that every failure degrades to
//! the placeholder instead of an error.

#[cfg(test)]
mod tests {
    use crate::avatars::*;
    use crate::errors::{Error, Result, SourceError};
    use crate::slug::SlugNormalizer;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const STORE_BASE: &str = "https://store.test/public/avatars";
    const PROFILE_BASE: &str = "https://profiles.test/players";

    // =========================================================================
    // Mock ObjectStore
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockStore {
        keys: Arc<Mutex<HashSet<String>>>,
        uploads: Arc<Mutex<Vec<(String, String)>>>,
        probes: Arc<Mutex<usize>>,
        lists: Arc<Mutex<usize>>,
        fail_probe: Arc<Mutex<bool>>,
        fail_upload: Arc<Mutex<bool>>,
    }

    impl MockStore {
        fn with_keys(keys: &[&str]) -> Self {
            let store = Self::default();
            store
                .keys
                .lock()
                .unwrap()
                .extend(keys.iter().map(|k| k.to_string()));
            store
        }

        fn probe_count(&self) -> usize {
            *self.probes.lock().unwrap() + *self.lists.lock().unwrap()
        }

        fn uploads(&self) -> Vec<(String, String)> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for MockStore {
        async fn probe_exists(&self, key: &str) -> Result<bool> {
            *self.probes.lock().unwrap() += 1;
            if *self.fail_probe.lock().unwrap() {
                return Err(Error::Source(SourceError::Unavailable {
                    service: "STORE".into(),
                    message: "boom".into(),
                }));
            }
            Ok(self.keys.lock().unwrap().contains(key))
        }

        async fn list_by_key(&self, key: &str) -> Result<Vec<String>> {
            *self.lists.lock().unwrap() += 1;
            // Mimics a prefix search returning near-misses too.
            Ok(self
                .keys
                .lock()
                .unwrap()
                .iter()
                .filter(|k| k.starts_with(key.trim_end_matches(".jpg")))
                .cloned()
                .collect())
        }

        fn public_url(&self, key: &str) -> String {
            format!("{STORE_BASE}/{key}")
        }

        async fn upload(
            &self,
            key: &str,
            _bytes: Vec<u8>,
            content_type: &str,
            overwrite: bool,
        ) -> Result<()> {
            assert!(overwrite, "uploads must overwrite");
            if *self.fail_upload.lock().unwrap() {
                return Err(Error::Unexpected("upload rejected".into()));
            }
            self.uploads
                .lock()
                .unwrap()
                .push((key.to_string(), content_type.to_string()));
            self.keys.lock().unwrap().insert(key.to_string());
            Ok(())
        }
    }

    // =========================================================================
    // Mock PageFetcher
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockFetcher {
        pages: Arc<Mutex<HashMap<String, String>>>,
        images: Arc<Mutex<HashMap<String, FetchedImage>>>,
        page_calls: Arc<Mutex<Vec<String>>>,
        offline: Arc<Mutex<bool>>,
    }

    impl MockFetcher {
        fn add_profile(&self, slug: &str, img_src: &str) {
            let html = format!(
                r#"<html><body>
                    <img class="logo" src="https://profiles.test/logo.png">
                    <img class="img-responsive" src="{img_src}">
                    <img class="img-responsive" src="https://profiles.test/second.jpg">
                </body></html>"#
            );
            self.pages
                .lock()
                .unwrap()
                .insert(format!("{PROFILE_BASE}/{slug}/"), html);
        }

        fn add_image(&self, url: &str, content_type: &str) {
            self.images.lock().unwrap().insert(
                url.to_string(),
                FetchedImage {
                    bytes: vec![0xff, 0xd8, 0xff],
                    content_type: content_type.to_string(),
                },
            );
        }

        fn page_calls(&self) -> usize {
            self.page_calls.lock().unwrap().len()
        }
    }

    fn not_found(url: &str) -> Error {
        Error::Source(SourceError::NotFound {
            service: "WEB".into(),
            what: url.to_string(),
        })
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String> {
            self.page_calls.lock().unwrap().push(url.to_string());
            if *self.offline.lock().unwrap() {
                return Err(Error::Source(SourceError::Timeout {
                    service: "WEB".into(),
                }));
            }
            self.pages
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| not_found(url))
        }

        async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
            self.images
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| not_found(url))
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn service_with(
        store: &MockStore,
        fetcher: &MockFetcher,
        settings: AvatarSettings,
    ) -> (AvatarService, Arc<AvatarCache>) {
        let cache = Arc::new(AvatarCache::new());
        let store_arc: Arc<dyn ObjectStore> = Arc::new(store.clone());
        let scraper =
            ProfileScraper::new(Arc::new(fetcher.clone()), store_arc.clone(), PROFILE_BASE)
                .unwrap();
        let service = AvatarService::new(
            Arc::new(SlugNormalizer::with_builtin_overrides()),
            cache.clone(),
            store_arc,
            scraper,
            settings,
        );
        (service, cache)
    }

    // =========================================================================
    // Tier ordering
    // =========================================================================

    #[tokio::test]
    async fn test_memory_hit_skips_store_and_scrape() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        let (service, cache) = service_with(&store, &fetcher, AvatarSettings::default());
        cache.insert("josh-allen", "https://cached/josh.jpg");

        let resolution = service.resolve_detailed("Josh Allen").await;

        assert_eq!(resolution.url, "https://cached/josh.jpg");
        assert_eq!(resolution.source, AvatarSource::Memory);
        assert_eq!(store.probe_count(), 0);
        assert_eq!(fetcher.page_calls(), 0);
    }

    #[tokio::test]
    async fn test_store_hit_populates_memory() {
        let store = MockStore::with_keys(&["josh-allen.jpg"]);
        let fetcher = MockFetcher::default();
        let (service, cache) = service_with(&store, &fetcher, AvatarSettings::default());

        let url = service.resolve_avatar("Josh Allen").await;

        assert_eq!(url, format!("{STORE_BASE}/josh-allen.jpg"));
        assert_eq!(cache.get("josh-allen"), CacheLookup::Hit(url.clone()));
        assert_eq!(fetcher.page_calls(), 0);

        // Second call answered from memory.
        let again = service.resolve_detailed("Josh Allen").await;
        assert_eq!(again.source, AvatarSource::Memory);
        assert_eq!(store.probe_count(), 1);
    }

    #[tokio::test]
    async fn test_list_probe_requires_exact_key() {
        let store = MockStore::with_keys(&["josh-allen-2.jpg"]);
        let fetcher = MockFetcher::default();
        let settings = AvatarSettings {
            probe: ProbeStrategy::List,
            ..AvatarSettings::default()
        };
        let (service, _) = service_with(&store, &fetcher, settings.clone());

        let resolution = service.resolve_detailed("Josh Allen").await;
        assert_eq!(resolution.source, AvatarSource::Placeholder);

        let store = MockStore::with_keys(&["josh-allen.jpg", "josh-allen-2.jpg"]);
        let (service, _) = service_with(&store, &fetcher, settings);
        let resolution = service.resolve_detailed("Josh Allen").await;
        assert_eq!(resolution.source, AvatarSource::Store);
    }

    #[tokio::test]
    async fn test_scrape_on_miss_uploads_once() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        let raw = "https://img.test/image/upload/t_headshot_desktop/f_auto/league/abc";
        fetcher.add_profile("brian-thomas-jr", raw);
        fetcher.add_image("https://img.test/image/upload/f_auto/league/abc", "image/png");
        let (service, cache) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Brian Thomas").await;

        assert_eq!(resolution.source, AvatarSource::Scraped);
        assert_eq!(resolution.url, format!("{STORE_BASE}/brian-thomas-jr.jpg"));
        assert_eq!(
            store.uploads(),
            vec![("brian-thomas-jr.jpg".to_string(), "image/png".to_string())]
        );
        assert_eq!(store.probe_count(), 1);
        assert_eq!(
            cache.get("brian-thomas-jr"),
            CacheLookup::Hit(resolution.url.clone())
        );
    }

    #[tokio::test]
    async fn test_missing_content_type_defaults_to_jpeg() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        fetcher.add_profile("puka-nacua", "https://img.test/puka.jpg");
        fetcher.add_image("https://img.test/puka.jpg", "");
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        service.resolve_avatar("Puka Nacua").await;

        assert_eq!(store.uploads()[0].1, "image/jpeg");
    }

    // =========================================================================
    // Graceful degradation
    // =========================================================================

    #[tokio::test]
    async fn test_empty_name_returns_placeholder_without_io() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        assert_eq!(service.resolve_avatar("   ").await, DEFAULT_PLACEHOLDER_URL);
        assert_eq!(store.probe_count(), 0);
        assert_eq!(fetcher.page_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_profile_returns_placeholder() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        let (service, cache) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Nobody Special").await;

        assert_eq!(resolution.url, DEFAULT_PLACEHOLDER_URL);
        assert!(resolution.failure.unwrap().contains("not found"));
        assert_eq!(cache.get("nobody-special"), CacheLookup::Miss);
        assert!(store.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_probe_error_treated_as_miss() {
        let store = MockStore::with_keys(&["josh-allen.jpg"]);
        *store.fail_probe.lock().unwrap() = true;
        let fetcher = MockFetcher::default();
        fetcher.add_profile("josh-allen", "https://img.test/josh.jpg");
        fetcher.add_image("https://img.test/josh.jpg", "image/jpeg");
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Josh Allen").await;

        assert_eq!(resolution.source, AvatarSource::Scraped);
        assert_eq!(fetcher.page_calls(), 1);
    }

    #[tokio::test]
    async fn test_non_https_image_rejected() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        fetcher.add_profile("old-timer", "http://img.test/old.jpg");
        fetcher.add_image("http://img.test/old.jpg", "image/jpeg");
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Old Timer").await;

        assert_eq!(resolution.source, AvatarSource::Placeholder);
        assert!(store.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_relative_image_rejected() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        fetcher.add_profile("relative-path", "/images/headshot.jpg");
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Relative Path").await;
        assert_eq!(resolution.source, AvatarSource::Placeholder);
    }

    #[tokio::test]
    async fn test_upload_failure_returns_placeholder_and_skips_cache() {
        let store = MockStore::default();
        *store.fail_upload.lock().unwrap() = true;
        let fetcher = MockFetcher::default();
        fetcher.add_profile("josh-allen", "https://img.test/josh.jpg");
        fetcher.add_image("https://img.test/josh.jpg", "image/jpeg");
        let (service, cache) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Josh Allen").await;

        assert_eq!(resolution.url, DEFAULT_PLACEHOLDER_URL);
        assert!(resolution.failure.unwrap().contains("upload"));
        assert_eq!(cache.get("josh-allen"), CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_offline_fetcher_returns_placeholder() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        *fetcher.offline.lock().unwrap() = true;
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        let resolution = service.resolve_detailed("Josh Allen").await;
        assert_eq!(resolution.source, AvatarSource::Placeholder);
        assert!(resolution.failure.unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_negative_cache_is_opt_in() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();

        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());
        service.resolve_avatar("Ghost Player").await;
        service.resolve_avatar("Ghost Player").await;
        assert_eq!(fetcher.page_calls(), 2);

        let fetcher = MockFetcher::default();
        let settings = AvatarSettings {
            negative_ttl: Some(Duration::from_secs(300)),
            ..AvatarSettings::default()
        };
        let (service, _) = service_with(&store, &fetcher, settings);
        service.resolve_avatar("Ghost Player").await;
        let second = service.resolve_detailed("Ghost Player").await;
        assert_eq!(fetcher.page_calls(), 1);
        assert_eq!(second.source, AvatarSource::Placeholder);
    }

    // =========================================================================
    // Batch warming
    // =========================================================================

    #[tokio::test]
    async fn test_warm_dedups_by_slug() {
        let store = MockStore::with_keys(&["josh-allen.jpg"]);
        let fetcher = MockFetcher::default();
        fetcher.add_profile("devon-achane", "https://img.test/achane.jpg");
        fetcher.add_image("https://img.test/achane.jpg", "image/jpeg");
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        let reports = service
            .warm_avatars(vec![
                "Josh Allen".into(),
                "josh allen".into(),
                "De'Von Achane".into(),
                "Devon Achane".into(),
                "".into(),
                "Ghost Player".into(),
            ])
            .await;

        let slugs: Vec<&str> = reports.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["josh-allen", "devon-achane", "ghost-player"]);
        assert_eq!(reports[0].status, WarmStatus::Cached);
        assert_eq!(reports[1].status, WarmStatus::Uploaded);
        assert_eq!(reports[2].status, WarmStatus::Failed);
        assert!(reports[2].url.is_none());
        assert!(reports[2].reason.is_some());
        assert_eq!(store.uploads().len(), 1);
    }

    #[tokio::test]
    async fn test_warm_empty_input() {
        let store = MockStore::default();
        let fetcher = MockFetcher::default();
        let (service, _) = service_with(&store, &fetcher, AvatarSettings::default());

        assert!(service.warm_avatars(vec![]).await.is_empty());
    }

    // =========================================================================
    // Scraper helpers
    // =========================================================================

    #[test]
    fn test_extract_first_matching_image() {
        let scraper = ProfileScraper::new(
            Arc::new(MockFetcher::default()),
            Arc::new(MockStore::default()),
            "https://profiles.test/players/",
        )
        .unwrap();
        let html = r#"<div><img src="x.png"><img class="img-responsive main" src=" https://a.test/1.jpg "></div>"#;

        assert_eq!(
            scraper.extract_image_src(html).as_deref(),
            Some("https://a.test/1.jpg")
        );
        assert_eq!(scraper.extract_image_src("<p>no images</p>"), None);
        assert_eq!(
            scraper.profile_url("josh-allen"),
            "https://profiles.test/players/josh-allen/"
        );
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let scraper = ProfileScraper::new(
            Arc::new(MockFetcher::default()),
            Arc::new(MockStore::default()),
            PROFILE_BASE,
        )
        .unwrap();
        assert!(scraper.with_selector("img[").is_err());
    }
}
