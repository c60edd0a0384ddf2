//! Player name to storage slug normalization.
//!
//! Display names coming from different sources disagree on suffixes and
//! punctuation ("Brian Thomas" vs "Brian Thomas Jr."). The override table maps
//! known variants onto one canonical name before the slug is derived, so every
//! variant lands on the same object key.

mod name_overrides;
mod slug_normalizer;


pub use name_overrides::{NameOverrides, DEFAULT_NAME_OVERRIDES};
pub use slug_normalizer::{is_valid_slug, slugify, SlugNormalizer};
