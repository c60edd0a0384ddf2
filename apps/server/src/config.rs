use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use rosterhub_core::avatars::{
    ProbeStrategy, DEFAULT_AVATAR_CONCURRENCY, DEFAULT_AVATAR_EXTENSION, DEFAULT_PLACEHOLDER_URL,
};
use rosterhub_core::trade::SAFE_MARGIN;
use rosterhub_core::valuations::DEFAULT_VALUES_TTL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,

    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub avatar_bucket: String,
    pub avatar_extension: String,
    pub avatar_probe: ProbeStrategy,
    pub default_avatar_url: String,
    pub profile_base_url: Option<String>,
    pub scrape_timeout: Duration,
    pub avatar_concurrency: usize,
    /// `None` disables negative caching.
    pub avatar_negative_ttl: Option<Duration>,
    pub name_overrides_path: Option<PathBuf>,

    pub safe_margin: f64,
    pub values_ttl: Duration,
    pub values_base_url: Option<String>,
    pub sleeper_base_url: Option<String>,
}

fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Finite, non-negative margin; anything else falls back to [`SAFE_MARGIN`].
fn parse_margin(raw: Option<&str>) -> f64 {
    match raw.map(|v| v.parse::<f64>()) {
        None => SAFE_MARGIN,
        Some(Ok(margin)) if margin.is_finite() && margin >= 0.0 => margin,
        Some(_) => {
            tracing::warn!(
                "Ignoring invalid RH_SAFE_MARGIN {:?}, using {}",
                raw,
                SAFE_MARGIN
            );
            SAFE_MARGIN
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = var_or("RH_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid RH_LISTEN_ADDR")?;
        let cors_allow = var_or("RH_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let log_format = match var_or("RH_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let avatar_probe = match var("RH_AVATAR_PROBE") {
            Some(raw) => raw.parse().map_err(|e: String| anyhow!(e))?,
            None => ProbeStrategy::Head,
        };
        let negative_ttl_secs: u64 = parsed_or("RH_AVATAR_NEGATIVE_TTL_SECS", 0);

        Ok(Self {
            listen_addr,
            db_path: var_or("RH_DB_PATH", "./db/app.db"),
            cors_allow,
            request_timeout: Duration::from_millis(parsed_or("RH_REQUEST_TIMEOUT_MS", 30000)),
            log_format,
            supabase_url: var("SUPABASE_URL"),
            supabase_key: var("SUPABASE_SERVICE_ROLE_KEY"),
            avatar_bucket: var_or("RH_AVATAR_BUCKET", "avatars"),
            avatar_extension: var_or("RH_AVATAR_EXT", DEFAULT_AVATAR_EXTENSION),
            avatar_probe,
            default_avatar_url: var_or("RH_DEFAULT_AVATAR_URL", DEFAULT_PLACEHOLDER_URL),
            profile_base_url: var("RH_PROFILE_BASE_URL"),
            scrape_timeout: Duration::from_millis(parsed_or("RH_SCRAPE_TIMEOUT_MS", 8000)),
            avatar_concurrency: parsed_or("RH_AVATAR_CONCURRENCY", DEFAULT_AVATAR_CONCURRENCY)
                .max(1),
            avatar_negative_ttl: (negative_ttl_secs > 0)
                .then(|| Duration::from_secs(negative_ttl_secs)),
            name_overrides_path: var("RH_NAME_OVERRIDES_PATH").map(PathBuf::from),
            safe_margin: parse_margin(var("RH_SAFE_MARGIN").as_deref()),
            values_ttl: Duration::from_secs(parsed_or(
                "RH_VALUES_TTL_SECS",
                DEFAULT_VALUES_TTL.as_secs(),
            )),
            values_base_url: var("RH_VALUES_BASE_URL"),
            sleeper_base_url: var("RH_SLEEPER_BASE_URL"),
        })
    }
}
