//! Playlist domain types

use super::ids::{PlaylistId, TrackId};
use super::track::Track;
use crate::error::{CadenceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlists seeded on first run and after a cache reset
pub const DEFAULT_PLAYLISTS: [(&str, &str); 3] = [
    ("default-1", "Favorites"),
    ("default-2", "Workout Mix"),
    ("default-3", "Chill Vibes"),
];

/// User playlist
///
/// Track ids are unique within a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name (trimmed, never empty)
    pub name: String,

    /// Tracks in insertion order
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Creation timestamp
    #[serde(rename = "created", alias = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new, empty playlist
    ///
    /// # Errors
    /// Returns `InvalidInput` when the trimmed name is empty
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_id(
            PlaylistId::generate(),
            validate_name(name.as_ref())?,
            Utc::now(),
        ))
    }

    /// Create a playlist with a specific ID (for seeding and loading)
    pub fn with_id(id: PlaylistId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            tracks: Vec::new(),
            created_at,
        }
    }

    /// Create a playlist from a track list, dropping repeated ids
    ///
    /// # Errors
    /// Returns `InvalidInput` when the trimmed name is empty
    pub fn from_tracks(name: impl AsRef<str>, tracks: &[Track]) -> Result<Self> {
        let mut playlist = Self::new(name)?;
        for track in tracks {
            if !playlist.contains(&track.id) {
                playlist.tracks.push(track.clone());
            }
        }
        Ok(playlist)
    }

    /// Append a track
    ///
    /// # Errors
    /// Returns `Duplicate` when the track is already present
    pub fn add_track(&mut self, track: Track) -> Result<()> {
        if self.contains(&track.id) {
            return Err(CadenceError::duplicate("Track already in playlist"));
        }
        self.tracks.push(track);
        Ok(())
    }

    /// Remove a track by id, returning whether it was present
    pub fn remove_track(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| &t.id != id);
        self.tracks.len() != before
    }

    /// Check membership by id
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CadenceError::invalid_input("Playlist name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Ordered collection of playlists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistLibrary {
    playlists: Vec<Playlist>,
}

impl PlaylistLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            playlists: Vec::new(),
        }
    }

    /// Library holding only the seeded defaults
    pub fn with_defaults() -> Self {
        let now = Utc::now();
        Self {
            playlists: DEFAULT_PLAYLISTS
                .iter()
                .map(|(id, name)| Playlist::with_id(PlaylistId::new(*id), *name, now))
                .collect(),
        }
    }

    /// Wrap an existing list (e.g. loaded from the preference store)
    pub fn from_vec(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    /// Create and append an empty playlist
    ///
    /// # Errors
    /// Returns `InvalidInput` when the trimmed name is empty
    pub fn create(&mut self, name: impl AsRef<str>) -> Result<&Playlist> {
        let playlist = Playlist::new(name)?;
        self.playlists.push(playlist);
        Ok(&self.playlists[self.playlists.len() - 1])
    }

    /// Append an already-built playlist
    pub fn push(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    /// Add a track to the playlist with the given id
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown playlist or `Duplicate` when the
    /// track is already in it
    pub fn add_track(&mut self, id: &PlaylistId, track: Track) -> Result<&Playlist> {
        let playlist = self
            .playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CadenceError::not_found("Playlist", id.as_str()))?;
        playlist.add_track(track)?;
        Ok(playlist)
    }

    /// Look up a playlist by id
    pub fn get(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    /// Look up a playlist by position
    pub fn get_index(&self, index: usize) -> Option<&Playlist> {
        self.playlists.get(index)
    }

    /// Find the first playlist whose name matches, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&Playlist> {
        let needle = name.trim();
        self.playlists
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(needle))
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.iter()
    }

    /// Borrow as a slice
    pub fn as_slice(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Number of playlists
    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    /// Check if there are no playlists
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}

impl Default for PlaylistLibrary {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str, title: &str) -> Track {
        Track::new(id, title, "Test Artist")
    }

    #[test]
    fn new_playlist_trims_name() {
        let playlist = Playlist::new("  Road Trip ").unwrap();
        assert_eq!(playlist.name, "Road Trip");
        assert!(playlist.is_empty());
        assert!(playlist.id.as_str().starts_with("playlist-"));
    }

    #[test]
    fn blank_name_rejected() {
        let err = Playlist::new("   ").unwrap_err();
        assert!(matches!(err, CadenceError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_track_rejected() {
        let mut playlist = Playlist::new("Mix").unwrap();
        playlist.add_track(create_test_track("1", "One")).unwrap();

        let err = playlist.add_track(create_test_track("1", "One again")).unwrap_err();
        assert!(matches!(err, CadenceError::Duplicate(_)));
        assert_eq!(playlist.len(), 1);
    }

    #[test]
    fn from_tracks_drops_repeats() {
        let tracks = vec![
            create_test_track("1", "One"),
            create_test_track("2", "Two"),
            create_test_track("1", "One"),
        ];
        let playlist = Playlist::from_tracks("Queue", &tracks).unwrap();
        let ids: Vec<_> = playlist.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn remove_track_reports_presence() {
        let mut playlist = Playlist::new("Mix").unwrap();
        playlist.add_track(create_test_track("1", "One")).unwrap();
        assert!(playlist.remove_track(&TrackId::new("1")));
        assert!(!playlist.remove_track(&TrackId::new("1")));
    }

    #[test]
    fn defaults_are_seeded_in_order() {
        let library = PlaylistLibrary::with_defaults();
        let names: Vec<_> = library.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Favorites", "Workout Mix", "Chill Vibes"]);
        assert_eq!(library.get_index(0).unwrap().id.as_str(), "default-1");
    }

    #[test]
    fn add_track_to_unknown_playlist_fails() {
        let mut library = PlaylistLibrary::with_defaults();
        let err = library
            .add_track(&PlaylistId::new("missing"), create_test_track("1", "One"))
            .unwrap_err();
        assert!(matches!(err, CadenceError::NotFound { .. }));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let library = PlaylistLibrary::with_defaults();
        assert_eq!(
            library.find_by_name("workout mix").unwrap().id.as_str(),
            "default-2"
        );
        assert!(library.find_by_name("nope").is_none());
    }

    #[test]
    fn persisted_form_uses_created_key() {
        let json = r#"[{"id":"default-1","name":"Favorites","tracks":[]}]"#;
        let library: PlaylistLibrary = serde_json::from_str(json).unwrap();
        assert_eq!(library.len(), 1);

        let out = serde_json::to_value(&library).unwrap();
        assert!(out[0].get("created").is_some());
    }
}
