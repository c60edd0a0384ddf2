//! Error types and retry classification for the feed clients.

use rosterhub_core::errors::{Error, SourceError};
use thiserror::Error;

/// How a caller should react to a failed request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The request is invalid or the entity does not exist.
    Never,
    /// Transient: rate limit, timeout or a 5xx.
    WithBackoff,
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Not found at {service}: {what}")]
    NotFound { service: String, what: String },

    #[error("Rate limited: {service}")]
    RateLimited { service: String },

    #[error("Timeout: {service}")]
    Timeout { service: String },

    /// Non-success status or transport failure.
    #[error("Provider error: {service} - {message}")]
    ProviderError {
        service: String,
        message: String,
        /// Upstream status when one was received.
        status: Option<u16>,
    },

    #[error("Failed to decode {service} response: {message}")]
    Decode { service: String, message: String },
}

impl FeedError {
    /// Classifies a `reqwest` failure.
    pub fn from_reqwest(service: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout {
                service: service.to_string(),
            }
        } else if err.is_decode() {
            FeedError::Decode {
                service: service.to_string(),
                message: err.to_string(),
            }
        } else {
            FeedError::ProviderError {
                service: service.to_string(),
                message: err.to_string(),
                status: err.status().map(|s| s.as_u16()),
            }
        }
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(service: &str, status: reqwest::StatusCode, what: &str) -> Self {
        match status.as_u16() {
            404 => FeedError::NotFound {
                service: service.to_string(),
                what: what.to_string(),
            },
            429 => FeedError::RateLimited {
                service: service.to_string(),
            },
            code => FeedError::ProviderError {
                service: service.to_string(),
                message: format!("HTTP {code} for {what}"),
                status: Some(code),
            },
        }
    }

    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::NotFound { .. } | Self::Decode { .. } => RetryClass::Never,
            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::WithBackoff,
            Self::ProviderError { status, .. } => match status {
                Some(code) if *code >= 500 => RetryClass::WithBackoff,
                Some(_) => RetryClass::Never,
                None => RetryClass::WithBackoff,
            },
        }
    }
}

impl From<FeedError> for SourceError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::NotFound { service, what } => SourceError::NotFound { service, what },
            FeedError::RateLimited { service } => SourceError::RateLimited { service },
            FeedError::Timeout { service } => SourceError::Timeout { service },
            FeedError::ProviderError {
                service, message, ..
            } => SourceError::Unavailable { service, message },
            FeedError::Decode { service, message } => SourceError::Decode { service, message },
        }
    }
}

impl From<FeedError> for Error {
    fn from(err: FeedError) -> Self {
        Error::Source(err.into())
    }
}
