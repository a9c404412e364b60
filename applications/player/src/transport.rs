//! Headless audio transport

///
/// Nothing is decoded or played; the transport records what it was told and
/// the runtime advances the clock with progress ticks.
use cadence_playback::{AudioTransport, PlaybackError, Result};
use tracing::debug;

#[derive(Debug, Default)]
pub struct HeadlessTransport {
    source: Option<String>,
    playing: bool,
    volume: u8,
    block_autoplay: bool,
}

impl HeadlessTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every `play` call, like a browser without a user gesture
    pub fn blocking_autoplay() -> Self {
        Self {
            block_autoplay: true,
            ..Self::default()
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

impl AudioTransport for HeadlessTransport {
    fn set_source(&mut self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(PlaybackError::ResolutionFailed("empty source".to_string()));
        }
        debug!(url, "Source set");
        self.source = Some(url.to_string());
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.block_autoplay {
            return Err(PlaybackError::PlaybackBlocked(
                "playback requires a user gesture".to_string(),
            ));
        }
        if self.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        debug!("Play");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        debug!("Pause");
        self.playing = false;
    }

    fn stop(&mut self) {
        debug!("Stop");
        self.playing = false;
        self.source = None;
    }

    fn seek(&mut self, seconds: f64) {
        debug!(seconds, "Seek");
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = percent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_needs_a_source() {
        let mut transport = HeadlessTransport::new();
        assert_eq!(transport.play(), Err(PlaybackError::NoTrackLoaded));

        transport.set_source("https://cdn/a.mp3").unwrap();
        transport.play().unwrap();
        assert!(transport.is_playing());

        transport.stop();
        assert!(transport.source().is_none());
    }

    #[test]
    fn blocked_autoplay() {
        let mut transport = HeadlessTransport::blocking_autoplay();
        transport.set_source("https://cdn/a.mp3").unwrap();
        assert!(matches!(
            transport.play(),
            Err(PlaybackError::PlaybackBlocked(_))
        ));
        assert!(!transport.is_playing());
    }
}
