//! Track type and display helpers

use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Artwork shown when a track carries no image
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";

/// Artist label used when upstream omits one
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A playable song obtained from the search collaborator
///
/// Tracks are immutable once obtained. Equality and hashing use `id` only, so
/// two copies of the same upstream item compare equal even if their display
/// metadata differs.
///
/// Field names on the wire (and in persisted state) follow the relay:
/// `id`, `title`, `artists`, `image`, `duration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Upstream identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist display string
    #[serde(rename = "artists", default = "unknown_artist")]
    pub artist: String,

    /// Artwork URL
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Duration in seconds, display only
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_hint: Option<u32>,
}

fn unknown_artist() -> String {
    UNKNOWN_ARTIST.to_string()
}

impl Track {
    /// Create a track with no artwork or duration
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            image_url: None,
            duration_hint: None,
        }
    }

    /// Builder-style artwork setter
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder-style duration setter
    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_hint = Some(seconds);
        self
    }

    /// Artwork URL, falling back to the placeholder
    pub fn image_or_placeholder(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Artist label, falling back to "Unknown Artist" for blank values
    pub fn artist_label(&self) -> &str {
        let artist = self.artist.trim();
        if artist.is_empty() {
            UNKNOWN_ARTIST
        } else {
            artist
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Format seconds as `M:SS`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
