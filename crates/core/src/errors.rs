//! Core error types for RosterHub.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) and HTTP client errors are converted to these
//! types by the storage and feeds crates.

use thiserror::Error;

use crate::avatars::AvatarError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Avatar resolution failed: {0}")]
    Avatar(#[from] AvatarError),

    #[error("Upstream source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

/// Errors raised by the external data sources (valuations, fantasy platform).
///
/// The `service` field names the upstream (e.g. `"SLEEPER"`, `"FANTASYCALC"`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The upstream answered but the requested entity does not exist.
    #[error("Not found at {service}: {what}")]
    NotFound { service: String, what: String },

    /// Transport failure or a non-success status from the upstream.
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },

    #[error("Rate limited by {service}")]
    RateLimited { service: String },

    #[error("Timed out talking to {service}")]
    Timeout { service: String },

    /// The upstream payload could not be decoded.
    #[error("Failed to decode {service} response: {message}")]
    Decode { service: String, message: String },
}

impl SourceError {
    pub fn service(&self) -> &str {
        match self {
            SourceError::NotFound { service, .. }
            | SourceError::Unavailable { service, .. }
            | SourceError::RateLimited { service }
            | SourceError::Timeout { service }
            | SourceError::Decode { service, .. } => service,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
