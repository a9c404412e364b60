//! Persisted application state
//!
//! Maps the typed state onto the preference keys. Loading is lenient: a
//! missing or malformed key falls back to its default and is logged, so a
//! corrupted entry never prevents startup.

use cadence_core::types::{LikedSongs, PlaylistLibrary, SearchHistory, Theme, Track};
use cadence_core::{PreferenceStore, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::warn;

use crate::preferences::{
    KEY_CURRENT_QUEUE_INDEX, KEY_LIKED_SONGS, KEY_PLAYLISTS, KEY_QUEUE, KEY_RECENTLY_PLAYED,
    KEY_SEARCH_HISTORY, KEY_THEME, KEY_VOLUME,
};

/// Everything that survives a restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedState {
    pub theme: Theme,
    pub volume: u8,
    pub liked_songs: LikedSongs,
    pub playlists: PlaylistLibrary,
    pub recently_played: Vec<Track>,
    pub search_history: SearchHistory,
    pub queue: Vec<Track>,
    pub current_queue_index: Option<usize>,
}

impl PersistedState {
    /// First-run state with the given default volume
    pub fn first_run(volume: u8) -> Self {
        Self {
            theme: Theme::default(),
            volume: volume.min(100),
            liked_songs: LikedSongs::new(),
            playlists: PlaylistLibrary::with_defaults(),
            recently_played: Vec::new(),
            search_history: SearchHistory::default(),
            queue: Vec::new(),
            current_queue_index: None,
        }
    }

    /// Read every key from `store`
    ///
    /// # Errors
    /// Only backend read failures are reported; malformed values fall back to
    /// defaults.
    pub async fn load(store: &dyn PreferenceStore, default_volume: u8) -> Result<Self> {
        let defaults = Self::first_run(default_volume);

        let theme = read_or(store, KEY_THEME, defaults.theme).await?;
        let volume = match store.get(KEY_VOLUME).await? {
            Some(value) => parse_volume(&value).unwrap_or_else(|| {
                warn!(value = %value, "Ignoring malformed persisted volume");
                defaults.volume
            }),
            None => defaults.volume,
        };
        let liked: Vec<Track> = read_or(store, KEY_LIKED_SONGS, Vec::new()).await?;
        let playlists = read_or(store, KEY_PLAYLISTS, defaults.playlists).await?;
        let recently_played = read_or(store, KEY_RECENTLY_PLAYED, Vec::new()).await?;
        let search_history = read_or(store, KEY_SEARCH_HISTORY, defaults.search_history).await?;
        let queue: Vec<Track> = read_or(store, KEY_QUEUE, Vec::new()).await?;
        let raw_index: i64 = read_or(store, KEY_CURRENT_QUEUE_INDEX, -1).await?;

        let current_queue_index = usize::try_from(raw_index)
            .ok()
            .filter(|&index| index < queue.len());

        Ok(Self {
            theme,
            volume,
            liked_songs: LikedSongs::from_vec(liked),
            playlists,
            recently_played,
            search_history,
            queue,
            current_queue_index,
        })
    }

    /// Write every key to `store` in one call
    ///
    /// # Errors
    /// Returns an error if the backend rejects the write
    pub async fn save(&self, store: &dyn PreferenceStore) -> Result<()> {
        store.set_many(&self.entries()?).await
    }

    /// The key/value pairs a save would write
    ///
    /// # Errors
    /// Returns an error if a value cannot be serialized
    pub fn entries(&self) -> Result<Vec<(&'static str, Value)>> {
        let index = self
            .current_queue_index
            .and_then(|index| i64::try_from(index).ok())
            .unwrap_or(-1);

        Ok(vec![
            (KEY_THEME, serde_json::to_value(self.theme)?),
            (KEY_VOLUME, json!(self.volume.to_string())),
            (KEY_LIKED_SONGS, serde_json::to_value(&self.liked_songs)?),
            (KEY_PLAYLISTS, serde_json::to_value(&self.playlists)?),
            (KEY_RECENTLY_PLAYED, serde_json::to_value(&self.recently_played)?),
            (KEY_SEARCH_HISTORY, serde_json::to_value(&self.search_history)?),
            (KEY_QUEUE, serde_json::to_value(&self.queue)?),
            (KEY_CURRENT_QUEUE_INDEX, json!(index)),
        ])
    }
}

async fn read_or<T: DeserializeOwned>(
    store: &dyn PreferenceStore,
    key: &str,
    default: T,
) -> Result<T> {
    let Some(value) = store.get(key).await? else {
        return Ok(default);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed persisted value");
            Ok(default)
        }
    }
}

/// Volume is stored as an integer string; bare numbers are accepted too
fn parse_volume(value: &Value) -> Option<u8> {
    let level = match value {
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    Some(level.clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPreferenceStore;

    #[tokio::test]
    async fn empty_store_yields_first_run_state() {
        let store = MemoryPreferenceStore::new();
        let state = PersistedState::load(&store, 70).await.unwrap();

        assert_eq!(state, PersistedState::first_run(70));
        assert_eq!(state.playlists.len(), 3);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryPreferenceStore::new();
        let mut state = PersistedState::first_run(70);
        state.theme = Theme::Light;
        state.volume = 35;
        state.queue = vec![Track::new("a", "A", "X"), Track::new("b", "B", "Y")];
        state.current_queue_index = Some(1);
        state.search_history.record("lofi");

        state.save(&store).await.unwrap();
        let loaded = PersistedState::load(&store, 70).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn persisted_encodings() {
        let store = MemoryPreferenceStore::new();
        PersistedState::first_run(70).save(&store).await.unwrap();

        assert_eq!(store.value(KEY_VOLUME), Some(json!("70")));
        assert_eq!(store.value(KEY_CURRENT_QUEUE_INDEX), Some(json!(-1)));
        assert_eq!(store.value(KEY_THEME), Some(json!("dark")));
    }

    #[tokio::test]
    async fn malformed_values_fall_back() {
        let store = MemoryPreferenceStore::new();
        store
            .set_many(&[
                (KEY_VOLUME, json!("loud")),
                (KEY_QUEUE, json!({"not": "a list"})),
                (KEY_THEME, json!("purple")),
            ])
            .await
            .unwrap();

        let state = PersistedState::load(&store, 55).await.unwrap();
        assert_eq!(state.volume, 55);
        assert!(state.queue.is_empty());
        assert_eq!(state.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn index_outside_queue_is_dropped() {
        let store = MemoryPreferenceStore::new();
        store
            .set_many(&[
                (KEY_QUEUE, json!([{"id": "a", "title": "A"}])),
                (KEY_CURRENT_QUEUE_INDEX, json!(4)),
            ])
            .await
            .unwrap();

        let state = PersistedState::load(&store, 70).await.unwrap();
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.current_queue_index, None);
    }

    #[test]
    fn volume_accepts_numbers_and_clamps() {
        assert_eq!(parse_volume(&json!(150)), Some(100));
        assert_eq!(parse_volume(&json!(" 40 ")), Some(40));
        assert_eq!(parse_volume(&json!(null)), None);
    }
}
