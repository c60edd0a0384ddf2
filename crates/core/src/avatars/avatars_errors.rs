use thiserror::Error;

/// Failure kinds of the scrape-on-miss path.
///
/// None of these reach the caller of [`super::AvatarService::resolve_avatar`];
/// they are logged and reported by batch warming.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvatarError {
    /// No profile page, no image on it, or the image URL is unusable.
    #[error("Avatar not found: {0}")]
    NotFound(String),

    /// The page or image host could not be reached.
    #[error("Avatar upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Avatar upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid avatar input: {0}")]
    InvalidInput(String),
}
