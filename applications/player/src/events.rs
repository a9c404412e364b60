//! Application events
//!
//! Every user action and every collaborator or transport callback is one
//! [`AppEvent`] fed to `Controller::dispatch`. Indexes refer to the list the
//! user sees (search results, queue rows, recent searches) and are 0-based.

use crate::effects::{LyricsTicket, SearchTicket};
use cadence_core::{Lyrics, ResolverResult, Theme, Track, TrackId};
use cadence_playback::LoadTicket;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // ===== Search =====
    /// Run a search with the selected engine
    Search(String),
    /// Select the search engine used from now on
    SelectEngine(String),
    /// Run the n-th recent search again
    ReplaySearch(usize),
    /// Replace the queue with the results and play the n-th
    PlayResult(usize),
    /// Append the n-th result to the queue
    EnqueueResult(usize),
    /// Toggle the like state of the n-th result
    LikeResult(usize),

    // ===== Transport Controls =====
    TogglePlay,
    Next,
    Previous,
    SeekTo(f64),
    SeekForward,
    SeekBackward,
    ToggleShuffle,
    CycleRepeat,
    SetVolume(i32),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    /// Toggle the like state of the active track
    LikeCurrent,

    // ===== Queue =====
    /// Play the n-th queue row
    JumpTo(usize),
    RemoveFromQueue(usize),
    ClearQueue,
    /// Save the queue as a new playlist; a blank name picks a dated default
    SaveQueueAsPlaylist(String),

    // ===== Playlists =====
    CreatePlaylist(String),
    /// Add the active track to the playlist with this name or id
    AddCurrentToPlaylist(String),
    /// Show a playlist's tracks in the results list
    ViewPlaylist(String),

    // ===== Settings =====
    SetTheme(Theme),
    ToggleTheme,
    /// Drop caches and reset every persisted preference
    ClearCache,

    // ===== Collaborator Callbacks =====
    SearchCompleted {
        ticket: SearchTicket,
        query: String,
        engine: String,
        result: ResolverResult<Vec<Track>>,
    },
    AudioResolved {
        ticket: LoadTicket,
        result: ResolverResult<String>,
    },
    LyricsFetched {
        ticket: LyricsTicket,
        track_id: TrackId,
        result: ResolverResult<Lyrics>,
    },

    // ===== Transport Callbacks =====
    Progress { position: f64, total: f64 },
    TrackEnded,
    PlaybackFailed(String),
}

impl AppEvent {
    /// Whether the event answers an outstanding collaborator call
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::SearchCompleted { .. } | Self::AudioResolved { .. } | Self::LyricsFetched { .. }
        )
    }
}
