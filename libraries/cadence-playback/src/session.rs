//! Playback session
//!
//! Owns the audio transport, volume, and recently-played list, and tracks
//! which track is active. Loading is split in two steps so that resolution can
//! happen off the event loop:
//!
//! 1. [`PlaybackSession::load`] answers from the cache or issues a
//!    [`LoadTicket`]
//! 2. [`PlaybackSession::complete_load`] applies the resolver's answer if the
//!    ticket is still current
//!
//! Issuing a new ticket supersedes any load still in flight.

use crate::cache::TrackCache;
use crate::error::{PlaybackError, Result};
use crate::history::RecentlyPlayed;
use crate::queue::Queue;
use crate::transport::AudioTransport;
use crate::types::{Direction, PlaybackConfig, RepeatMode};
use crate::volume::Volume;
use cadence_core::{ResolverError, Track};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Tag for an outstanding audio resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A track that became active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub track: Track,

    /// The transport refused to start; the user must press play
    pub autoplay_blocked: bool,
}

/// Outcome of [`PlaybackSession::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStep {
    /// Source came from the cache; the track is active now
    Ready(Loaded),

    /// Source must be resolved; feed the answer to `complete_load`
    Resolve(LoadTicket),
}

/// Outcome of a natural end of track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Repeat-one restarted the same track
    Restarted,

    /// The queue advanced; this track should be loaded
    Advance(Track),

    /// Nothing left to play; the last track stays active
    Stopped,
}

/// Transient playback state
pub struct PlaybackSession {
    transport: Box<dyn AudioTransport>,
    active_track: Option<Track>,
    is_playing: bool,
    position_seconds: f64,
    total_seconds: f64,
    volume: Volume,
    recently_played: RecentlyPlayed,
    next_ticket: u64,
    pending: Option<(LoadTicket, Track)>,
}

impl PlaybackSession {
    /// Create a session around an output device
    pub fn new(transport: Box<dyn AudioTransport>, config: &PlaybackConfig) -> Self {
        let volume = Volume::new(i32::from(config.initial_volume));
        let mut session = Self {
            transport,
            active_track: None,
            is_playing: false,
            position_seconds: 0.0,
            total_seconds: 0.0,
            volume,
            recently_played: RecentlyPlayed::new(config.history_size),
            next_ticket: 0,
            pending: None,
        };
        session.transport.set_volume(session.volume.level());
        session
    }

    // ===== Loading =====

    /// Start loading `track`
    ///
    /// A fresh cached source makes the track active immediately. Otherwise a
    /// ticket is issued and any earlier in-flight load is superseded.
    pub fn load(&mut self, track: Track, cache: &TrackCache, now: DateTime<Utc>) -> LoadStep {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);

        if let Some(url) = cache.fresh_audio(&track.id, now).cloned() {
            debug!(track_id = %track.id, "Audio source served from cache");
            self.pending = None;
            match self.apply_source(track.clone(), &url) {
                Ok(loaded) => return LoadStep::Ready(loaded),
                Err(e) => {
                    warn!(track_id = %track.id, error = %e, "Cached source rejected, resolving again");
                }
            }
        }

        debug!(track_id = %track.id, ticket = ticket.0, "Resolving audio source");
        self.pending = Some((ticket, track));
        LoadStep::Resolve(ticket)
    }

    /// Apply the resolver's answer for `ticket`
    ///
    /// Returns `Ok(None)` when the ticket has been superseded. On failure the
    /// previously active track stays active.
    ///
    /// # Errors
    /// `UpstreamTimeout` for timeouts, `ResolutionFailed` for everything else
    /// including an empty source
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<String, ResolverError>,
        cache: &mut TrackCache,
        now: DateTime<Utc>,
    ) -> Result<Option<Loaded>> {
        let track = match self.pending.take() {
            Some((pending, track)) if pending == ticket => track,
            other => {
                debug!(ticket = ticket.0, "Discarding superseded audio resolution");
                self.pending = other;
                return Ok(None);
            }
        };

        let url = match result {
            Ok(url) if url.trim().is_empty() => {
                return Err(PlaybackError::ResolutionFailed(format!(
                    "no audio source for {}",
                    track.title
                )))
            }
            Ok(url) => url,
            Err(ResolverError::UpstreamTimeout) => return Err(PlaybackError::UpstreamTimeout),
            Err(e) => return Err(PlaybackError::ResolutionFailed(e.to_string())),
        };

        cache.audio_mut().put_at(track.id.clone(), url.clone(), now);
        self.apply_source(track, &url).map(Some)
    }

    fn apply_source(&mut self, track: Track, url: &str) -> Result<Loaded> {
        self.transport.set_source(url)?;

        info!(track_id = %track.id, title = %track.title, "Track loaded");
        self.position_seconds = 0.0;
        self.total_seconds = track.duration_hint.map(f64::from).unwrap_or(0.0);
        self.recently_played.record(track.clone());
        self.active_track = Some(track.clone());

        let autoplay_blocked = match self.transport.play() {
            Ok(()) => {
                self.is_playing = true;
                false
            }
            Err(e) => {
                warn!(error = %e, "Autoplay blocked");
                self.is_playing = false;
                true
            }
        };

        Ok(Loaded {
            track,
            autoplay_blocked,
        })
    }

    /// Drop any in-flight load
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Track currently being resolved
    pub fn pending_track(&self) -> Option<&Track> {
        self.pending.as_ref().map(|(_, track)| track)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// # Errors
    /// `NoTrackLoaded`, or `PlaybackBlocked` when the transport refuses
    pub fn play(&mut self) -> Result<()> {
        if self.active_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        match self.transport.play() {
            Ok(()) => {
                self.is_playing = true;
                Ok(())
            }
            Err(e) => {
                self.is_playing = false;
                Err(e)
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.transport.pause();
        self.is_playing = false;
    }

    /// Play if paused, pause if playing; returns the new playing state
    ///
    /// # Errors
    /// Same as [`play`](Self::play)
    pub fn toggle(&mut self) -> Result<bool> {
        if self.is_playing {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.is_playing)
    }

    /// Stop and forget the active track
    pub fn stop_and_clear(&mut self) {
        self.transport.stop();
        self.active_track = None;
        self.is_playing = false;
        self.position_seconds = 0.0;
        self.total_seconds = 0.0;
    }

    /// Seek to an absolute position, clamped to the track length
    ///
    /// A non-finite target leaves the position untouched.
    ///
    /// # Errors
    /// `NoTrackLoaded`
    pub fn seek_to(&mut self, seconds: f64) -> Result<()> {
        if self.active_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if !seconds.is_finite() {
            return Ok(());
        }
        let upper = if self.total_seconds > 0.0 {
            self.total_seconds
        } else {
            f64::MAX
        };
        self.position_seconds = seconds.clamp(0.0, upper);
        self.transport.seek(self.position_seconds);
        Ok(())
    }

    /// Seek relative to the current position
    ///
    /// # Errors
    /// `NoTrackLoaded`
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.seek_to(self.position_seconds + delta)
    }

    /// Record a progress report from the transport
    pub fn update_progress(&mut self, position: f64, total: f64) {
        if position.is_finite() {
            self.position_seconds = position.max(0.0);
        }
        if total.is_finite() && total > 0.0 {
            self.total_seconds = total;
        }
    }

    // ===== Transport Callbacks =====

    /// React to the active track finishing on its own
    ///
    /// Repeat-one restarts the track. Repeat-all or an available next track
    /// advances the queue. Otherwise playback stops with the last track still
    /// active.
    pub fn on_natural_completion(&mut self, queue: &mut Queue) -> Completion {
        if queue.repeat_mode() == RepeatMode::One && self.active_track.is_some() {
            self.position_seconds = 0.0;
            self.transport.seek(0.0);
            if let Err(e) = self.play() {
                warn!(error = %e, "Could not restart track");
            }
            return Completion::Restarted;
        }

        if queue.repeat_mode() == RepeatMode::All || queue.has_next() {
            if let Ok(track) = queue.advance(Direction::Next) {
                return Completion::Advance(track.clone());
            }
        }

        self.is_playing = false;
        self.position_seconds = self.total_seconds;
        Completion::Stopped
    }

    /// React to a mid-playback failure by skipping forward
    ///
    /// # Errors
    /// `EmptyQueue` or `EndOfQueue` when there is nothing to skip to; playback
    /// stays stopped
    pub fn on_playback_error(&mut self, queue: &mut Queue) -> Result<Track> {
        self.is_playing = false;
        queue.advance(Direction::Next).map(Track::clone)
    }

    // ===== Volume =====

    /// Set volume (clamped to 0-100)
    pub fn set_volume(&mut self, percent: i32) {
        self.volume.set_level(percent);
        self.transport.set_volume(self.volume.level());
    }

    /// Adjust volume by `delta` points
    pub fn adjust_volume(&mut self, delta: i32) {
        self.volume.adjust(delta);
        self.transport.set_volume(self.volume.level());
    }

    /// Toggle mute, returning the new mute state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.volume.toggle_mute();
        self.transport.set_volume(self.volume.level());
        muted
    }

    // ===== Accessors =====

    pub fn active_track(&self) -> Option<&Track> {
        self.active_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn recently_played(&self) -> &RecentlyPlayed {
        &self.recently_played
    }

    /// Replace the recently played list (startup restore, cache reset)
    pub fn set_recently_played(&mut self, recently_played: RecentlyPlayed) {
        self.recently_played = recently_played;
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("active_track", &self.active_track)
            .field("is_playing", &self.is_playing)
            .field("position_seconds", &self.position_seconds)
            .field("volume", &self.volume)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
