//! Database operations for the marketplace store.
//!
//! One repository struct per entity, each borrowing the shared pool:
//!
//! - [`users::UserRepository`]
//! - [`sellers::SellerRepository`]
//! - [`products::ProductRepository`]
//! - [`history::HistoryRepository`]
//! - [`notifications::NotificationRepository`]
//!
//! Queries are runtime-checked; uniqueness constraints live in the schema
//! (`migrations/`) and surface as [`RepositoryError::Conflict`].

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub mod history;
pub mod notifications;
pub mod products;
pub mod sellers;
pub mod users;

pub use history::HistoryRepository;
pub use notifications::NotificationRepository;
pub use products::ProductRepository;
pub use sellers::SellerRepository;
pub use users::UserRepository;

/// Embedded schema migrations (run on startup and by the test harness).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error to `Conflict` when it is a unique violation,
    /// keeping the original error otherwise.
    pub(crate) fn from_unique_violation(e: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_msg.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing; foreign keys are enforced.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
