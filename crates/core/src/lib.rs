//! RosterHub Core - domain models, services, and traits.
//!
//! This crate holds the avatar resolution pipeline, the trade engine and the
//! fantasy-platform reports. It performs no I/O of its own: HTTP clients live
//! in `rosterhub-feeds` and persistence in `rosterhub-storage-sqlite`, both
//! plugged in through the traits defined here.

pub mod avatars;
pub mod errors;
pub mod players;
pub mod sleeper;
pub mod slug;
pub mod trade;
pub mod valuations;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
