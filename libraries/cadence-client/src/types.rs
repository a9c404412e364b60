//! Configuration and wire types for the relay API.

use cadence_core::types::{Track, TrackId, UNKNOWN_ARTIST};
use serde::Deserialize;
use std::time::Duration;

/// Relay address used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Search engine used when none is selected
pub const DEFAULT_ENGINE: &str = "gaama";

/// Search engines the relay understands
pub const SEARCH_ENGINES: [&str; 3] = ["gaama", "wynk", "jiosaavn"];

/// Bounds for the per-request timeout
pub const MIN_TIMEOUT: Duration = Duration::from_secs(5);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Base URL including the API prefix (e.g., "http://localhost:3000/api")
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Route answering audio-source lookups ("song" on the relay, "fetch" on older deployments)
    pub audio_route: String,
}

impl ResolverConfig {
    /// Config for the given base URL with default timeout and route.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            audio_route: "song".to_string(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_audio_route(mut self, route: impl Into<String>) -> Self {
        self.audio_route = route.into();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// `{ "success": bool, "data": ... }` wrapper around every relay answer
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Ids arrive as strings from most engines and as numbers from some
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireDuration {
    Seconds(f64),
    Text(String),
}

impl WireDuration {
    fn seconds(&self) -> Option<u32> {
        let secs = match self {
            Self::Seconds(s) => *s,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if secs.is_finite() && secs > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(secs.round().min(f64::from(u32::MAX)) as u32)
        } else {
            None
        }
    }
}

/// One search result as the relay sends it
#[derive(Debug, Deserialize)]
pub(crate) struct WireTrack {
    pub id: WireId,
    pub title: String,
    #[serde(default, alias = "singers", alias = "artist")]
    pub artists: Option<String>,
    #[serde(default, alias = "thumbnail")]
    pub image: Option<String>,
    #[serde(default)]
    pub duration: Option<WireDuration>,
}

impl WireTrack {
    /// Validate into a [`Track`]; blank ids or titles are rejected
    pub fn into_track(self) -> Option<Track> {
        let id = self.id.into_string();
        let title = self.title.trim();
        if id.trim().is_empty() || title.is_empty() {
            return None;
        }

        let artist = self
            .artists
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        Some(Track {
            id: TrackId::new(id),
            title: title.to_string(),
            artist,
            image_url: self.image.filter(|url| !url.trim().is_empty()),
            duration_hint: self.duration.as_ref().and_then(WireDuration::seconds),
        })
    }
}
