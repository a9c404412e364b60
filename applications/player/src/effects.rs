//! Effects returned by the controller
//!
//! The controller never performs I/O. Each dispatch returns the effects the
//! runtime must carry out; collaborator calls are tagged with a ticket so a
//! late answer can be matched against the newest request.

use cadence_core::TrackId;
use cadence_playback::LoadTicket;

/// Tag for an outstanding search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Tag for an outstanding lyrics request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LyricsTicket(u64);

impl LyricsTicket {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call `Resolver::search`, answer with `AppEvent::SearchCompleted`
    Search {
        ticket: SearchTicket,
        query: String,
        engine: String,
    },

    /// Call `Resolver::resolve_audio`, answer with `AppEvent::AudioResolved`
    ResolveAudio { ticket: LoadTicket, track_id: TrackId },

    /// Call `Resolver::fetch_lyrics`, answer with `AppEvent::LyricsFetched`
    FetchLyrics {
        ticket: LyricsTicket,
        track_id: TrackId,
    },

    /// Write the persisted snapshot
    Persist,

    /// Wipe the preference store before the next persist
    ResetStore,
}
