//! SQLite storage implementation for RosterHub.
//!
//! This crate is the only place in the workspace where Diesel dependencies
//! exist. It implements the repository traits defined in `rosterhub-core`:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The player directory repository
//!
//! ```text
//!   core (domain)
//!        │
//!        ▼
//!   storage-sqlite (this crate)
//!        │
//!        ▼
//!    SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod players;
pub mod schema;

pub use db::{
    create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use rosterhub_core::errors::{DatabaseError, Error, Result};
