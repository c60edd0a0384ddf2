//! Supabase Storage REST client, used as the durable avatar store.
//!
//! Endpoints (relative to the project URL):
//!
//! | Operation      | Request                                              |
//! |----------------|------------------------------------------------------|
//! | probe          | `HEAD /storage/v1/object/public/{bucket}/{key}`      |
//! | list           | `POST /storage/v1/object/list/{bucket}`              |
//! | upload         | `POST /storage/v1/object/{bucket}/{key}`             |
//! | public URL     | `/storage/v1/object/public/{bucket}/{key}`           |

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use rosterhub_core::avatars::ObjectStore;
use rosterhub_core::errors::Result;

use crate::errors::FeedError;
use crate::http::{build_client, trim_base, CLIENT_USER_AGENT, DEFAULT_TIMEOUT};

pub const DEFAULT_AVATAR_BUCKET: &str = "avatars";

const SERVICE: &str = "SUPABASE";

/// Search results are exact-name checks, so a handful is plenty.
const LIST_LIMIT: u32 = 10;

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    pub service_key: String,
    pub bucket: String,
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
            bucket: DEFAULT_AVATAR_BUCKET.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    search: &'a str,
    limit: u32,
}

#[derive(Deserialize)]
struct ListedObject {
    name: String,
}

pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: build_client(config.timeout, CLIENT_USER_AGENT),
            base_url: trim_base(&config.url),
            service_key: config.service_key,
            bucket: config.bucket,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.service_key)
    }

    fn transport(e: reqwest::Error) -> FeedError {
        FeedError::from_reqwest(SERVICE, e)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn probe_exists(&self, key: &str) -> Result<bool> {
        let url = self.public_url(key);
        let response = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            other => Err(FeedError::from_status(SERVICE, other, &url).into()),
        }
    }

    async fn list_by_key(&self, key: &str) -> Result<Vec<String>> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .header("apikey", &self.service_key)
            .json(&ListRequest {
                prefix: "",
                search: key,
                limit: LIST_LIMIT,
            })
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::from_status(SERVICE, status, &url).into());
        }

        let objects: Vec<ListedObject> = response.json().await.map_err(Self::transport)?;
        Ok(objects.into_iter().map(|o| o.name).collect())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }

    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        overwrite: bool,
    ) -> Result<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key);
        debug!("Uploading {} ({} bytes, {})", key, bytes.len(), content_type);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .header("apikey", &self.service_key)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", if overwrite { "true" } else { "false" })
            .body(bytes)
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upload of {} failed with {}: {}", key, status, body);
            return Err(FeedError::ProviderError {
                service: SERVICE.to_string(),
                message: format!("HTTP {} uploading {}", status.as_u16(), key),
                status: Some(status.as_u16()),
            }
            .into());
        }
        Ok(())
    }
}
