//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Queue navigation outcomes (`EmptyQueue`, `EndOfQueue`, `StartOfQueue`,
/// `OutOfRange`) are signals for the caller to turn into user feedback. None of
/// these errors are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Index outside the queue
    #[error("Index {index} out of range for queue of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Queue has no tracks
    #[error("Queue is empty")]
    EmptyQueue,

    /// `next` past the last track without repeat-all
    #[error("Reached end of queue")]
    EndOfQueue,

    /// `previous` before the first track without repeat-all
    #[error("This is the first track")]
    StartOfQueue,

    /// Queue already holds the maximum number of tracks
    #[error("Queue is full ({0} tracks)")]
    QueueFull(usize),

    /// The resolver could not produce a playable source
    #[error("Could not resolve audio: {0}")]
    ResolutionFailed(String),

    /// The resolver call timed out
    #[error("Audio resolution timed out")]
    UpstreamTimeout,

    /// The output transport refused to start playback
    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,
}

impl PlaybackError {
    /// Whether this is a queue navigation signal rather than a failure
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::EmptyQueue | Self::EndOfQueue | Self::StartOfQueue
        )
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
