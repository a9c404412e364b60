//! Liked songs set

use super::ids::TrackId;
use super::track::Track;
use serde::{Deserialize, Serialize};

/// Set of liked tracks, deduplicated by id, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikedSongs {
    tracks: Vec<Track>,
}

impl LikedSongs {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list, dropping repeated ids
    pub fn from_vec(tracks: Vec<Track>) -> Self {
        let mut liked = Self::new();
        for track in tracks {
            if !liked.contains(&track.id) {
                liked.tracks.push(track);
            }
        }
        liked
    }

    /// Flip membership of a track
    ///
    /// Returns `true` when the track is liked after the call.
    pub fn toggle(&mut self, track: &Track) -> bool {
        if self.remove(&track.id) {
            false
        } else {
            self.tracks.push(track.clone());
            true
        }
    }

    /// Remove a track by id, returning whether it was present
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| &t.id != id);
        self.tracks.len() != before
    }

    /// Check membership
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    /// Liked tracks in insertion order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of liked tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if nothing is liked
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_is_a_no_op() {
        let track = Track::new("1", "One", "Artist");
        let mut liked = LikedSongs::new();

        assert!(liked.toggle(&track));
        assert_eq!(liked.len(), 1);

        assert!(!liked.toggle(&track));
        assert!(liked.is_empty());
    }

    #[test]
    fn from_vec_deduplicates() {
        let liked = LikedSongs::from_vec(vec![
            Track::new("1", "One", "A"),
            Track::new("1", "One", "A"),
            Track::new("2", "Two", "B"),
        ]);
        assert_eq!(liked.len(), 2);
        assert!(liked.contains(&TrackId::new("2")));
    }
}
