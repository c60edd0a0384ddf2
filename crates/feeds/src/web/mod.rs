//! Plain HTTP fetcher for player profile pages and their images.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use rosterhub_core::avatars::{FetchedImage, PageFetcher};
use rosterhub_core::errors::Result;

use crate::errors::FeedError;
use crate::http::{build_client, BROWSER_USER_AGENT};

pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(8);

const SERVICE: &str = "WEB";

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout, BROWSER_USER_AGENT),
        }
    }

    async fn get(&self, url: &str) -> std::result::Result<reqwest::Response, FeedError> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            // Any non-success page means there is nothing to scrape.
            return Err(FeedError::NotFound {
                service: SERVICE.to_string(),
                what: format!("HTTP {} for {}", status.as_u16(), url),
            });
        }
        Ok(response)
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_SCRAPE_TIMEOUT)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FeedError::from_reqwest(SERVICE, e))?;
        Ok(body)
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        let response = self.get(url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_default();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::from_reqwest(SERVICE, e))?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
