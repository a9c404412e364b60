//! Track cache
//!
//! Memoizes search results, resolved audio sources, and lyrics. Entries are
//! never evicted by size; they go stale once older than the retention window
//! and callers must then treat them as absent.

use cadence_core::{Lyrics, Track, TrackId};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// Cached value with its fetch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Whether the entry is still inside the retention window at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) <= retention
    }
}

/// One keyed cache kind
#[derive(Debug, Clone)]
pub struct CacheTable<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> CacheTable<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Entry for `key`, fresh or not
    pub fn get(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Value for `key` only if it is fresh at `now`
    pub fn get_fresh(&self, key: &K, now: DateTime<Utc>, retention: Duration) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, retention))
            .map(|entry| &entry.value)
    }

    /// Store `value`, stamping it with the current time
    pub fn put(&mut self, key: K, value: V) {
        self.put_at(key, value, Utc::now());
    }

    /// Store `value` with an explicit fetch time
    pub fn put_at(&mut self, key: K, value: V, fetched_at: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry { value, fetched_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Eq + Hash, V> Default for CacheTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Search cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub query: String,
    pub engine: String,
}

impl SearchKey {
    /// Build a key; the query is trimmed and lowercased
    pub fn new(query: &str, engine: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            engine: engine.to_string(),
        }
    }
}

/// All three cache kinds plus the shared retention window
#[derive(Debug, Clone)]
pub struct TrackCache {
    search: CacheTable<SearchKey, Vec<Track>>,
    audio: CacheTable<TrackId, String>,
    lyrics: CacheTable<TrackId, Lyrics>,
    retention: Duration,
}

impl TrackCache {
    /// Create an empty cache with the given retention window
    pub fn new(retention: Duration) -> Self {
        Self {
            search: CacheTable::new(),
            audio: CacheTable::new(),
            lyrics: CacheTable::new(),
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Search results by (query, engine)
    pub fn search(&self) -> &CacheTable<SearchKey, Vec<Track>> {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut CacheTable<SearchKey, Vec<Track>> {
        &mut self.search
    }

    /// Resolved audio source URLs by track id
    pub fn audio(&self) -> &CacheTable<TrackId, String> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut CacheTable<TrackId, String> {
        &mut self.audio
    }

    /// Lyrics by track id
    pub fn lyrics(&self) -> &CacheTable<TrackId, Lyrics> {
        &self.lyrics
    }

    pub fn lyrics_mut(&mut self) -> &mut CacheTable<TrackId, Lyrics> {
        &mut self.lyrics
    }

    /// Fresh search results at `now`
    pub fn fresh_search(&self, key: &SearchKey, now: DateTime<Utc>) -> Option<&Vec<Track>> {
        self.search.get_fresh(key, now, self.retention)
    }

    /// Fresh audio source at `now`
    pub fn fresh_audio(&self, id: &TrackId, now: DateTime<Utc>) -> Option<&String> {
        self.audio.get_fresh(id, now, self.retention)
    }

    /// Fresh lyrics at `now`
    pub fn fresh_lyrics(&self, id: &TrackId, now: DateTime<Utc>) -> Option<&Lyrics> {
        self.lyrics.get_fresh(id, now, self.retention)
    }

    /// Whether a fresh audio source exists (drives the "cached" badge)
    pub fn has_fresh_audio(&self, id: &TrackId, now: DateTime<Utc>) -> bool {
        self.fresh_audio(id, now).is_some()
    }

    /// Empty all three kinds at once
    pub fn clear(&mut self) {
        self.search.clear();
        self.audio.clear();
        self.lyrics.clear();
    }

    /// Total entries across all kinds
    pub fn len(&self) -> usize {
        self.search.len() + self.audio.len() + self.lyrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TrackCache {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
