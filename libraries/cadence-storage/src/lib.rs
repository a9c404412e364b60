//! Cadence Storage
//!
//! `SQLite`-backed preference store for Cadence.
//!
//! This crate persists user preferences and the queue snapshot between
//! sessions: theme, volume, liked songs, playlists, recently played, search
//! history, queue, and queue cursor.
//!
//! # Architecture
//!
//! - **Key/Value**: one `preferences` table, JSON values, stable short keys
//! - **Transactional Snapshots**: all keys written together
//! - **Pluggable**: both stores implement `cadence_core::PreferenceStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, run_migrations, PersistedState, SqlitePreferenceStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqlitePreferenceStore::new(pool);
//! let state = PersistedState::load(&store, 70).await?;
//! state.save(&store).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
pub mod preferences;
mod snapshot;

pub use error::{Result, StorageError};
pub use memory::MemoryPreferenceStore;
pub use preferences::SqlitePreferenceStore;
pub use snapshot::PersistedState;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

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
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = %database_url, "Creating SQLite pool");

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
