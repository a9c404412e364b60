//! Preference persistence
//!
//! Preferences are stored as key-value pairs with JSON-serialized values.
//! Snapshots write every key in one transaction so a crash never leaves the
//! queue and its cursor out of step.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::preferences;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! preferences::set_preference(pool, preferences::KEY_THEME, &serde_json::json!("dark")).await?;
//!
//! let theme = preferences::get_preference(pool, preferences::KEY_THEME).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use cadence_core::PreferenceStore;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::error::Result;

// Preference key constants
/// UI theme ("dark" or "light")
pub const KEY_THEME: &str = "theme";

/// Volume as an integer string ("0"-"100")
pub const KEY_VOLUME: &str = "volume";

/// Liked tracks (array of Track)
pub const KEY_LIKED_SONGS: &str = "likedSongs";

/// Playlists (array of Playlist)
pub const KEY_PLAYLISTS: &str = "playlists";

/// Recently played tracks, most recent first (at most 50)
pub const KEY_RECENTLY_PLAYED: &str = "recentlyPlayed";

/// Search queries, most recent first (at most 10)
pub const KEY_SEARCH_HISTORY: &str = "searchHistory";

/// Queue tracks in play order
pub const KEY_QUEUE: &str = "queue";

/// Queue cursor, -1 for none
pub const KEY_CURRENT_QUEUE_INDEX: &str = "currentQueueIndex";

/// Every key written by a snapshot
pub const ALL_KEYS: [&str; 8] = [
    KEY_THEME,
    KEY_VOLUME,
    KEY_LIKED_SONGS,
    KEY_PLAYLISTS,
    KEY_RECENTLY_PLAYED,
    KEY_SEARCH_HISTORY,
    KEY_QUEUE,
    KEY_CURRENT_QUEUE_INDEX,
];

/// Get a single preference value
///
/// Returns `Ok(None)` if the key has never been written.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored JSON is invalid
pub async fn get_preference(pool: &SqlitePool, key: &str) -> Result<Option<Value>> {
    let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.try_get("value")?;
            Ok(Some(serde_json::from_str(&raw)?))
        }
        None => Ok(None),
    }
}

/// Set a single preference value
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn set_preference(pool: &SqlitePool, key: &str, value: &Value) -> Result<()> {
    set_preferences(pool, &[(key, value.clone())]).await
}

/// Set several preference values in one transaction
///
/// # Errors
///
/// Returns an error if any write fails; no key is changed in that case
pub async fn set_preferences(pool: &SqlitePool, entries: &[(&str, Value)]) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    for (key, value) in entries {
        let value_str = serde_json::to_string(value)?;
        sqlx::query(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(*key)
        .bind(value_str)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// List every stored key
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn list_keys(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT key FROM preferences ORDER BY key")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| row.try_get::<String, _>("key").map_err(Into::into))
        .collect()
}

/// Delete every preference
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn clear_preferences(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM preferences").execute(pool).await?;
    Ok(())
}

/// [`PreferenceStore`] backed by the `preferences` table
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, key: &str) -> cadence_core::Result<Option<Value>> {
        Ok(get_preference(&self.pool, key).await?)
    }

    async fn set_many(&self, entries: &[(&str, Value)]) -> cadence_core::Result<()> {
        Ok(set_preferences(&self.pool, entries).await?)
    }

    async fn clear(&self) -> cadence_core::Result<()> {
        Ok(clear_preferences(&self.pool).await?)
    }
}
