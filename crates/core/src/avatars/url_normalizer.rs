use std::sync::LazyLock;

use regex::Regex;

use super::avatars_traits::ImageUrlNormalizer;

static TRANSFORM_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/t_[^/]+").expect("Invalid regex pattern"));

/// Removes `/t_<transform>` path segments from image-CDN URLs so the stored
/// copy is the original upload rather than a resized thumbnail.
#[derive(Debug, Clone)]
pub struct TransformSegmentStripper {
    markers: Vec<String>,
}

impl Default for TransformSegmentStripper {
    fn default() -> Self {
        Self::new(["upload/", "image/private/"])
    }
}

impl TransformSegmentStripper {
    /// Applies only to URLs containing one of `markers`.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }
}

impl ImageUrlNormalizer for TransformSegmentStripper {
    fn applies_to(&self, url: &str) -> bool {
        self.markers.iter().any(|m| url.contains(m.as_str()))
    }

    fn normalize(&self, url: &str) -> String {
        TRANSFORM_SEGMENT.replace_all(url, "").into_owned()
    }
}
