//! Collaborator traits for Cadence

use crate::error::{ResolverError, Result};
use crate::types::{Lyrics, Track, TrackId};
use async_trait::async_trait;
use serde_json::Value;

/// Result type for resolver calls
pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

/// Search, audio-source resolution, and lyrics provider
///
/// Implementations must bound every call with a timeout and report it as
/// [`ResolverError::UpstreamTimeout`]. Responses are validated here, so callers
/// only ever see well-formed tracks.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Search the catalogue with the given engine
    ///
    /// An empty list is a valid answer.
    ///
    /// # Errors
    /// `UpstreamUnavailable` or `UpstreamTimeout`
    async fn search(&self, query: &str, engine: &str) -> ResolverResult<Vec<Track>>;

    /// Resolve a track to a playable source URL
    ///
    /// # Errors
    /// `NotFound` when upstream has no source, otherwise `UpstreamUnavailable`
    /// or `UpstreamTimeout`
    async fn resolve_audio(&self, id: &TrackId) -> ResolverResult<String>;

    /// Fetch lyrics for a track
    ///
    /// # Errors
    /// `UpstreamUnavailable` or `UpstreamTimeout`
    async fn fetch_lyrics(&self, id: &TrackId) -> ResolverResult<Lyrics>;
}

/// Durable key/value store holding JSON values
///
/// Implementers provide persistence for user preferences and the queue
/// snapshot. Keys are short stable names such as `"volume"`.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read one key
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write several keys at once
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written
    async fn set_many(&self, entries: &[(&str, Value)]) -> Result<()>;

    /// Remove every key
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written
    async fn clear(&self) -> Result<()>;
}
