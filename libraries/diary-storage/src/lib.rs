//! Diary Storage
//!
//! Durable key/value storage backing the Diary client's local caches.
//!
//! Two `LocalStorage` implementations are provided:
//! - [`SqliteLocalStorage`]: a single `SQLite` table, survives restarts
//! - [`MemoryLocalStorage`]: a process-local map for tests and tools
//!
//! # Example
//!
//! ```rust,no_run
//! use diary_core::LocalStorage;
//! use diary_storage::SqliteLocalStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = SqliteLocalStorage::open("sqlite://identity.db").await?;
//! storage.set_item("userMapCache", "[]").await?;
//! assert_eq!(storage.get_item("userMapCache").await?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod sqlite;

pub use error::StorageError;
pub use memory::MemoryLocalStorage;
pub use sqlite::SqliteLocalStorage;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://identity.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
