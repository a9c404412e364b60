//! Audio transport trait
//!
//! Platform-specific output (a browser audio element, a desktop sink, a test
//! double) is provided via this trait. The session owns exactly one transport.

use crate::error::Result;

/// Single audio output device
pub trait AudioTransport: Send {
    /// Point the device at a new source URL, resetting position to 0
    ///
    /// # Errors
    /// `ResolutionFailed` if the device rejects the source outright
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Start or resume playback
    ///
    /// # Errors
    /// `PlaybackBlocked` when the platform refuses to start (e.g. autoplay
    /// policy). The caller surfaces this as a retry prompt.
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Stop playback and drop the source
    fn stop(&mut self);

    /// Seek to an absolute position in seconds
    fn seek(&mut self, seconds: f64);

    /// Set output volume (0-100)
    fn set_volume(&mut self, percent: u8);
}
