use std::sync::Arc;

use async_trait::async_trait;
use rosterhub_core::avatars::{
    AvatarCache, AvatarService, AvatarServiceTrait, AvatarSettings, ObjectStore, ProfileScraper,
    DEFAULT_PROFILE_BASE_URL,
};
use rosterhub_core::errors::{Result as CoreResult, SourceError};
use rosterhub_core::players::{PlayerService, PlayerServiceTrait};
use rosterhub_core::sleeper::{SleeperApi, SleeperService, SleeperServiceTrait};
use rosterhub_core::slug::{NameOverrides, SlugNormalizer};
use rosterhub_core::valuations::{ValuationService, ValuationServiceTrait};
use rosterhub_feeds::{
    FantasyCalcClient, HttpPageFetcher, SleeperClient, SupabaseConfig, SupabaseStorage,
};
use rosterhub_storage_sqlite::db::{self, spawn_writer};
use rosterhub_storage_sqlite::players::PlayerRepository;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub avatar_service: Arc<dyn AvatarServiceTrait>,
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
    pub sleeper_service: Arc<dyn SleeperServiceTrait>,
    pub player_service: Arc<dyn PlayerServiceTrait>,
    pub safe_margin: f64,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (json_layer, text_layer) = match format {
        LogFormat::Json => (Some(fmt::layer().json().with_current_span(false)), None),
        LogFormat::Text => (None, Some(fmt::layer())),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Object store used when Supabase is not configured. Nothing exists and
/// uploads fail, so avatars degrade to the placeholder.
struct UnconfiguredStore;

#[async_trait]
impl ObjectStore for UnconfiguredStore {
    async fn probe_exists(&self, _key: &str) -> CoreResult<bool> {
        Ok(false)
    }

    async fn list_by_key(&self, _key: &str) -> CoreResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn public_url(&self, key: &str) -> String {
        key.to_string()
    }

    async fn upload(
        &self,
        _key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
        _overwrite: bool,
    ) -> CoreResult<()> {
        Err(SourceError::Unavailable {
            service: "SUPABASE".to_string(),
            message: "object store is not configured".to_string(),
        }
        .into())
    }
}

fn build_store(config: &Config) -> Arc<dyn ObjectStore> {
    match (&config.supabase_url, &config.supabase_key) {
        (Some(url), Some(key)) => {
            let supabase = SupabaseConfig::new(url.clone(), key.clone())
                .with_bucket(config.avatar_bucket.clone());
            Arc::new(SupabaseStorage::new(supabase))
        }
        _ => {
            tracing::warn!(
                "SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY not set; avatars will use the placeholder"
            );
            Arc::new(UnconfiguredStore)
        }
    }
}

fn build_normalizer(config: &Config) -> anyhow::Result<SlugNormalizer> {
    let mut overrides = NameOverrides::builtin();
    if let Some(path) = &config.name_overrides_path {
        let extra = NameOverrides::from_path(path)?;
        tracing::info!(
            "Loaded {} name overrides from {}",
            extra.len(),
            path.display()
        );
        overrides.merge(extra);
    }
    Ok(SlugNormalizer::new(overrides))
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer(pool.as_ref().clone());
    let player_repository = Arc::new(PlayerRepository::new(pool.clone(), writer));

    let sleeper_api: Arc<dyn SleeperApi> =
        Arc::new(SleeperClient::new(config.sleeper_base_url.as_deref()));
    let fantasycalc = Arc::new(FantasyCalcClient::new(config.values_base_url.as_deref()));

    let store = build_store(config);
    let fetcher = Arc::new(HttpPageFetcher::new(config.scrape_timeout));
    let scraper = ProfileScraper::new(
        fetcher,
        store.clone(),
        config
            .profile_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PROFILE_BASE_URL),
    )?;
    let settings = AvatarSettings {
        extension: config.avatar_extension.clone(),
        placeholder_url: config.default_avatar_url.clone(),
        probe: config.avatar_probe,
        concurrency: config.avatar_concurrency,
        negative_ttl: config.avatar_negative_ttl,
    };
    let avatar_service = Arc::new(AvatarService::new(
        Arc::new(build_normalizer(config)?),
        Arc::new(AvatarCache::new()),
        store,
        scraper,
        settings,
    ));

    let valuation_service = Arc::new(ValuationService::new(fantasycalc, config.values_ttl));
    let sleeper_service = Arc::new(SleeperService::new(
        sleeper_api.clone(),
        player_repository.clone(),
    ));
    let player_service = Arc::new(PlayerService::new(player_repository, sleeper_api));

    Ok(Arc::new(AppState {
        avatar_service,
        valuation_service,
        sleeper_service,
        player_service,
        safe_margin: config.safe_margin,
    }))
}
