//! Database operations for the storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `clients` - Client directory, keyed by client code
//! - `articles` - Catalog entries looked up on article scans
//! - `orders` - Append-only order history (line items embedded as JSON)
//! - `logins` - One row per client per day, upserted on login
//! - `sessions` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p etn-cli -- migrate
//! ```
//!
//! Queries use the runtime sqlx API (`query_as`/`FromRow`) so the
//! workspace builds without a live database.

pub mod articles;
pub mod clients;
pub mod orders;

pub use articles::ArticleRepository;
pub use clients::ClientRepository;
pub use orders::{
    ClientOrderCount, CommentSplit, DailyLogins, OrderRepository, PeriodCount, StatsPeriod,
};

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors returned by repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value failed domain validation on read.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
