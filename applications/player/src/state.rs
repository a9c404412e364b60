//! Application state owned by the controller

use crate::effects::{LyricsTicket, SearchTicket};
use crate::notifications::Notification;
use cadence_core::types::MAX_RECENT_SEARCHES;
use cadence_core::{LikedSongs, Lyrics, PlaylistLibrary, SearchHistory, Theme, Track, TrackId};
use cadence_playback::{PlaybackConfig, PlaybackSession, Queue, RecentlyPlayed, TrackCache};
use cadence_storage::PersistedState;

/// Where the results list came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsSource {
    Search { query: String, engine: String },
    Playlist { name: String },
}

/// Search results panel
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub source: Option<ResultsSource>,
    pub results: Vec<Track>,
    /// Newest search still waiting for an answer
    pub pending: Option<SearchTicket>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

/// Lyrics panel contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LyricsPanel {
    #[default]
    Empty,
    Loading,
    Ready(Lyrics),
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct LyricsState {
    pub track_id: Option<TrackId>,
    pub panel: LyricsPanel,
    pub pending: Option<LyricsTicket>,
}

/// Everything the player knows
///
/// Mutated only by `Controller::dispatch`; views get a projection.
#[derive(Debug)]
pub struct AppState {
    pub queue: Queue,
    pub session: PlaybackSession,
    pub cache: TrackCache,
    pub liked: LikedSongs,
    pub playlists: PlaylistLibrary,
    pub search_history: SearchHistory,
    pub theme: Theme,
    pub engine: String,
    pub search: SearchState,
    pub lyrics: LyricsState,
    /// Notifications raised by the event being dispatched
    pub notifications: Vec<Notification>,
    history_size: usize,
}

impl AppState {
    pub fn new(session: PlaybackSession, config: &PlaybackConfig, engine: impl Into<String>) -> Self {
        Self {
            queue: Queue::with_max_size(config.max_queue_size),
            session,
            cache: TrackCache::new(config.cache_retention),
            liked: LikedSongs::new(),
            playlists: PlaylistLibrary::with_defaults(),
            search_history: SearchHistory::new(MAX_RECENT_SEARCHES),
            theme: Theme::default(),
            engine: engine.into(),
            search: SearchState::default(),
            lyrics: LyricsState::default(),
            notifications: Vec::new(),
            history_size: config.history_size,
        }
    }

    /// Apply a persisted snapshot (startup)
    pub fn restore(&mut self, persisted: PersistedState) {
        self.theme = persisted.theme;
        self.session.set_volume(i32::from(persisted.volume));
        self.liked = persisted.liked_songs;
        self.playlists = persisted.playlists;
        self.search_history = persisted.search_history;

        let mut recently_played = RecentlyPlayed::from(persisted.recently_played);
        recently_played.set_max_size(self.history_size);
        self.session.set_recently_played(recently_played);

        self.queue.restore(persisted.queue, persisted.current_queue_index);
    }

    /// Snapshot of everything that survives a restart
    pub fn snapshot(&self) -> PersistedState {
        let volume = self.session.volume();
        PersistedState {
            theme: self.theme,
            // Muted and untouched since: keep the level unmute will restore
            volume: if volume.is_muted() && volume.is_silent() {
                volume.pre_mute_level()
            } else {
                volume.level()
            },
            liked_songs: self.liked.clone(),
            playlists: self.playlists.clone(),
            recently_played: self
                .session
                .recently_played()
                .get_all()
                .into_iter()
                .cloned()
                .collect(),
            search_history: self.search_history.clone(),
            queue: self.queue.tracks().to_vec(),
            current_queue_index: self.queue.current_index(),
        }
    }

    /// Forget caches and every persisted collection, reseeding default playlists
    ///
    /// Theme, volume, and the active track are kept.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.liked = LikedSongs::new();
        self.playlists = PlaylistLibrary::with_defaults();
        self.search_history.clear();
        self.session.set_recently_played(RecentlyPlayed::new(self.history_size));
        self.queue.clear(None);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn is_liked(&self, id: &TrackId) -> bool {
        self.liked.contains(id)
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.session.active_track()
    }
}
