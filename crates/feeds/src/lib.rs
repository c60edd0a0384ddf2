//! HTTP clients for RosterHub's external sources.
//!
//! Each client implements one of the collaborator traits from
//! `rosterhub-core`, so the domain services never see `reqwest`:
//!
//! ```text
//!   ┌────────────────────┐   ValuationSource   ┌──────────────────────┐
//!   │ FantasyCalcClient  │ ──────────────────► │                      │
//!   ├────────────────────┤   SleeperApi        │                      │
//!   │ SleeperClient      │ ──────────────────► │   rosterhub-core     │
//!   ├────────────────────┤   PageFetcher       │   services           │
//!   │ HttpPageFetcher    │ ──────────────────► │                      │
//!   ├────────────────────┤   ObjectStore       │                      │
//!   │ SupabaseStorage    │ ──────────────────► │                      │
//!   └────────────────────┘                     └──────────────────────┘
//! ```
//!
//! Transport errors are classified by [`errors::FeedError`] and converted to
//! `rosterhub_core::errors::SourceError` at the trait boundary.

pub mod errors;
pub mod fantasycalc;
mod http;
pub mod rate_limit;
pub mod sleeper;
pub mod supabase;
pub mod web;

pub use errors::{FeedError, RetryClass};
pub use fantasycalc::FantasyCalcClient;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use sleeper::SleeperClient;
pub use supabase::{SupabaseConfig, SupabaseStorage};
pub use web::HttpPageFetcher;
