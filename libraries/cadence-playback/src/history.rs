//! Recently played tracking
//!
//! Maintains a bounded, most-recent-first list of loaded tracks.

use cadence_core::Track;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Recently played tracks with bounded size
///
/// Loading a track moves it to the front; a track appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Track>", into = "Vec<Track>")]
pub struct RecentlyPlayed {
    /// History buffer (most recent = front)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl RecentlyPlayed {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a track at the front
    ///
    /// An earlier entry with the same id is dropped; the oldest entry is
    /// discarded once the bound is exceeded.
    pub fn record(&mut self, track: Track) {
        self.tracks.retain(|t| t.id != track.id);
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    /// Most recent track
    pub fn latest(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// All tracks, most recent first
    pub fn get_all(&self) -> Vec<&Track> {
        self.tracks.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set maximum history size
    ///
    /// If new size is smaller than current, oldest entries are discarded
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.tracks.truncate(max_size);
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(50) // Default: 50 tracks
    }
}

impl From<Vec<Track>> for RecentlyPlayed {
    fn from(tracks: Vec<Track>) -> Self {
        let mut history = Self::default();
        for track in tracks.into_iter().rev() {
            history.record(track);
        }
        history
    }
}

impl From<RecentlyPlayed> for Vec<Track> {
    fn from(history: RecentlyPlayed) -> Self {
        history.tracks.into_iter().collect()
    }
}
