//! Shared `reqwest` plumbing for the feed clients.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::{FeedError, RetryClass};
use crate::rate_limit::RateLimiter;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser-like agent; some profile pages refuse obvious bot agents.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub(crate) const CLIENT_USER_AGENT: &str = concat!("rosterhub/", env!("CARGO_PKG_VERSION"));

const RETRY_DELAY: Duration = Duration::from_millis(500);

pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        })
}

pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// `base_url` with `segments` appended, each percent-encoded as a single
/// path segment.
pub(crate) fn endpoint(service: &str, base_url: &str, segments: &[&str]) -> Result<String, FeedError> {
    let invalid = |message: String| FeedError::ProviderError {
        service: service.to_string(),
        message,
        status: None,
    };
    let mut url =
        Url::parse(base_url).map_err(|e| invalid(format!("invalid base URL {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| invalid(format!("{base_url} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

/// GET `url` and decode the JSON body. Transient failures are retried once.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &str,
    url: &str,
    limiter: Option<&RateLimiter>,
) -> Result<T, FeedError> {
    match get_json_once(client, service, url, limiter).await {
        Err(err) if err.retry_class() == RetryClass::WithBackoff => {
            debug!("{} request failed ({}), retrying once: {}", service, err, url);
            tokio::time::sleep(RETRY_DELAY).await;
            get_json_once(client, service, url, limiter).await
        }
        other => other,
    }
}

async fn get_json_once<T: DeserializeOwned>(
    client: &Client,
    service: &str,
    url: &str,
    limiter: Option<&RateLimiter>,
) -> Result<T, FeedError> {
    if let Some(limiter) = limiter {
        limiter.acquire().await;
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FeedError::from_reqwest(service, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::from_status(service, status, url));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FeedError::from_reqwest(service, e))?;

    serde_json::from_str(&body).map_err(|e| FeedError::Decode {
        service: service.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = endpoint("SLEEPER", "https://api.sleeper.app/v1", &["user", "a/b?x y"]).unwrap();
        assert_eq!(url, "https://api.sleeper.app/v1/user/a%2Fb%3Fx%20y");

        let url = endpoint("SLEEPER", "http://localhost:9000", &["players", "nfl"]).unwrap();
        assert_eq!(url, "http://localhost:9000/players/nfl");

        assert!(endpoint("SLEEPER", "not a url", &["user"]).is_err());
    }
}
