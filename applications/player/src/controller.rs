//! Event dispatcher
//!
//! [`Controller::dispatch`] is the only way state changes. It is synchronous:
//! it applies one event to [`AppState`], raises notifications, and returns the
//! [`Effect`]s the runtime must perform. Collaborator answers come back later
//! as events carrying the ticket they were issued with; answers whose ticket
//! is no longer current are dropped.

use crate::effects::{Effect, LyricsTicket, SearchTicket};
use crate::events::AppEvent;
use crate::notifications::Notification;
use crate::state::{AppState, LyricsPanel, ResultsSource};
use cadence_client::SEARCH_ENGINES;
use cadence_core::{
    CadenceError, Lyrics, Playlist, PlaylistId, ResolverError, ResolverResult, Theme, Track,
    TrackId,
};
use cadence_playback::{
    Completion, Direction, LoadStep, LoadTicket, Loaded, PlaybackError, RepeatMode, SearchKey,
};
use cadence_storage::PersistedState;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Step sizes for relative controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSteps {
    pub volume: i32,
    pub seek_seconds: f64,
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self {
            volume: 10,
            seek_seconds: 10.0,
        }
    }
}

pub struct Controller {
    state: AppState,
    steps: ControlSteps,
    search_seq: u64,
    lyrics_seq: u64,
}

impl Controller {
    pub fn new(state: AppState, steps: ControlSteps) -> Self {
        Self {
            state,
            steps,
            search_seq: 0,
            lyrics_seq: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply a persisted snapshot
    pub fn restore(&mut self, persisted: PersistedState) {
        self.state.restore(persisted);
        info!(
            queued = self.state.queue.len(),
            liked = self.state.liked.len(),
            playlists = self.state.playlists.len(),
            "Restored saved state"
        );
    }

    /// Snapshot for the preference store
    pub fn snapshot(&self) -> PersistedState {
        self.state.snapshot()
    }

    /// Apply one event and return the effects to perform
    pub fn dispatch(&mut self, event: AppEvent) -> Vec<Effect> {
        self.dispatch_at(event, Utc::now())
    }

    /// [`dispatch`](Self::dispatch) with an explicit clock, for cache freshness
    pub fn dispatch_at(&mut self, event: AppEvent, now: DateTime<Utc>) -> Vec<Effect> {
        self.state.notifications.clear();
        let mut fx = Vec::new();

        match event {
            // ===== Search =====
            AppEvent::Search(query) => self.search(&query, now, &mut fx),
            AppEvent::SelectEngine(engine) => self.select_engine(&engine),
            AppEvent::ReplaySearch(index) => {
                if let Some(query) = self.state.search_history.get(index).map(str::to_string) {
                    self.search(&query, now, &mut fx);
                }
            }
            AppEvent::PlayResult(index) => self.play_result(index, now, &mut fx),
            AppEvent::EnqueueResult(index) => {
                if let Some(track) = self.state.search.results.get(index).cloned() {
                    self.enqueue(track, now, &mut fx);
                }
            }
            AppEvent::LikeResult(index) => {
                if let Some(track) = self.state.search.results.get(index).cloned() {
                    self.toggle_like(&track, &mut fx);
                }
            }

            // ===== Transport Controls =====
            AppEvent::TogglePlay => self.toggle_play(now, &mut fx),
            AppEvent::Next => self.navigate(Direction::Next, now, &mut fx),
            AppEvent::Previous => self.navigate(Direction::Previous, now, &mut fx),
            AppEvent::SeekTo(seconds) => ignore_seek(self.state.session.seek_to(seconds)),
            AppEvent::SeekForward => {
                ignore_seek(self.state.session.seek_by(self.steps.seek_seconds));
            }
            AppEvent::SeekBackward => {
                ignore_seek(self.state.session.seek_by(-self.steps.seek_seconds));
            }
            AppEvent::ToggleShuffle => self.toggle_shuffle(&mut fx),
            AppEvent::CycleRepeat => self.cycle_repeat(&mut fx),
            AppEvent::SetVolume(percent) => {
                self.state.session.set_volume(percent);
                fx.push(Effect::Persist);
            }
            AppEvent::VolumeUp => self.step_volume(self.steps.volume, &mut fx),
            AppEvent::VolumeDown => self.step_volume(-self.steps.volume, &mut fx),
            AppEvent::ToggleMute => self.toggle_mute(&mut fx),
            AppEvent::LikeCurrent => match self.state.active_track().cloned() {
                Some(track) => self.toggle_like(&track, &mut fx),
                None => self.notify(Notification::warning("No track is playing")),
            },

            // ===== Queue =====
            AppEvent::JumpTo(index) => match self.state.queue.jump_to(index) {
                Ok(track) => {
                    let track = track.clone();
                    self.start_load(track, now, &mut fx);
                }
                Err(e) => debug!(index, error = %e, "Ignoring jump outside the queue"),
            },
            AppEvent::RemoveFromQueue(index) => self.remove_from_queue(index, &mut fx),
            AppEvent::ClearQueue => self.clear_queue(&mut fx),
            AppEvent::SaveQueueAsPlaylist(name) => self.save_queue_as_playlist(&name, now, &mut fx),

            // ===== Playlists =====
            AppEvent::CreatePlaylist(name) => match self.state.playlists.create(&name) {
                Ok(playlist) => {
                    let message = format!("Playlist \"{}\" created", playlist.name);
                    self.notify(Notification::success(message));
                    fx.push(Effect::Persist);
                }
                Err(_) => self.notify(Notification::warning("Playlist name cannot be empty")),
            },
            AppEvent::AddCurrentToPlaylist(key) => self.add_current_to_playlist(&key, &mut fx),
            AppEvent::ViewPlaylist(key) => self.view_playlist(&key),

            // ===== Settings =====
            AppEvent::SetTheme(theme) => self.set_theme(theme, &mut fx),
            AppEvent::ToggleTheme => {
                let theme = self.state.theme.toggled();
                self.set_theme(theme, &mut fx);
            }
            AppEvent::ClearCache => self.clear_cache(&mut fx),

            // ===== Collaborator Callbacks =====
            AppEvent::SearchCompleted {
                ticket,
                query,
                engine,
                result,
            } => self.search_completed(ticket, &query, &engine, result, now),
            AppEvent::AudioResolved { ticket, result } => {
                self.audio_resolved(ticket, result, now, &mut fx);
            }
            AppEvent::LyricsFetched {
                ticket,
                track_id,
                result,
            } => self.lyrics_fetched(ticket, &track_id, result, now),

            // ===== Transport Callbacks =====
            AppEvent::Progress { position, total } => {
                self.state.session.update_progress(position, total);
            }
            AppEvent::TrackEnded => self.track_ended(now, &mut fx),
            AppEvent::PlaybackFailed(reason) => self.playback_failed(&reason, now, &mut fx),
        }

        collapse_persists(&mut fx);
        fx
    }

    fn notify(&mut self, notification: Notification) {
        self.state.notify(notification);
    }

    // ===== Search =====

    fn search(&mut self, query: &str, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let query = query.trim();
        if query.is_empty() {
            self.notify(Notification::warning("Please enter a search query"));
            return;
        }

        // History is updated before the call resolves
        self.state.search_history.record(query);
        fx.push(Effect::Persist);

        self.search_seq += 1;
        let ticket = SearchTicket::new(self.search_seq);
        let engine = self.state.engine.clone();
        self.state.search.source = Some(ResultsSource::Search {
            query: query.to_string(),
            engine: engine.clone(),
        });

        let key = SearchKey::new(query, &engine);
        if let Some(results) = self.state.cache.fresh_search(&key, now).cloned() {
            debug!(query, engine = %engine, "Search served from cache");
            self.state.search.pending = None;
            self.state.search.results = results;
            return;
        }

        self.state.search.pending = Some(ticket);
        self.state.search.results.clear();
        fx.push(Effect::Search {
            ticket,
            query: query.to_string(),
            engine,
        });
    }

    fn search_completed(
        &mut self,
        ticket: SearchTicket,
        query: &str,
        engine: &str,
        result: ResolverResult<Vec<Track>>,
        now: DateTime<Utc>,
    ) {
        if self.state.search.pending != Some(ticket) {
            debug!(ticket = ticket.value(), query, "Discarding superseded search results");
            return;
        }
        self.state.search.pending = None;

        let key = SearchKey::new(query, engine);
        match result {
            Ok(tracks) => {
                debug!(query, engine, results = tracks.len(), "Search results arrived");
                self.state.cache.search_mut().put_at(key, tracks.clone(), now);
                self.state.search.results = tracks;
            }
            Err(ResolverError::UpstreamTimeout) => {
                warn!(query, engine, "Search timed out");
                self.notify(Notification::warning("Search timed out. Please try again."));
            }
            Err(e) => {
                warn!(query, engine, error = %e, "Search failed");
                if let Some(entry) = self.state.cache.search().get(&key) {
                    self.state.search.results = entry.value.clone();
                    self.notify(Notification::info("Showing cached results"));
                } else {
                    self.notify(Notification::error("Failed to search. Please try again."));
                }
            }
        }
    }

    fn select_engine(&mut self, engine: &str) {
        let engine = engine.trim().to_lowercase();
        if SEARCH_ENGINES.contains(&engine.as_str()) {
            self.state.engine = engine;
        } else {
            self.notify(Notification::warning(format!(
                "Unknown search engine \"{engine}\""
            )));
        }
    }

    fn play_result(&mut self, index: usize, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let results = self.state.search.results.clone();
        let Some(track) = results.get(index).cloned() else {
            return;
        };
        if let Err(e) = self.state.queue.set_queue(results, index) {
            debug!(index, error = %e, "Could not replace queue");
            return;
        }
        self.start_load(track, now, fx);
        fx.push(Effect::Persist);
    }

    // ===== Loading =====

    fn start_load(&mut self, track: Track, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        self.notify(Notification::info(format!("Loading {}...", track.title)));
        let track_id = track.id.clone();
        match self.state.session.load(track, &self.state.cache, now) {
            LoadStep::Ready(loaded) => self.on_loaded(loaded, now, fx),
            LoadStep::Resolve(ticket) => fx.push(Effect::ResolveAudio { ticket, track_id }),
        }
    }

    fn audio_resolved(
        &mut self,
        ticket: LoadTicket,
        result: ResolverResult<String>,
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) {
        let title = self
            .state
            .session
            .pending_track()
            .map(|track| track.title.clone())
            .unwrap_or_default();

        match self
            .state
            .session
            .complete_load(ticket, result, &mut self.state.cache, now)
        {
            Ok(Some(loaded)) => self.on_loaded(loaded, now, fx),
            Ok(None) => {}
            Err(e) => {
                warn!(title = %title, error = %e, "Track failed to load");
                let message = match e {
                    PlaybackError::UpstreamTimeout => format!("Timed out loading {title}"),
                    _ => format!("Failed to play {title}"),
                };
                self.notify(Notification::error(message));

                // Playback stays on the previous track; keep the cursor on it
                if let Some(active) = self.state.active_track().map(|t| t.id.clone()) {
                    self.state.queue.focus(&active);
                }
            }
        }
    }

    fn on_loaded(&mut self, loaded: Loaded, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let id = loaded.track.id.clone();
        if self.state.queue.current().map(|t| &t.id) != Some(&id) {
            self.state.queue.focus(&id);
        }
        if loaded.autoplay_blocked {
            self.notify(Notification::warning("Click play button to start playback"));
        }
        self.request_lyrics(&loaded.track, now, fx);
        fx.push(Effect::Persist);
    }

    fn request_lyrics(&mut self, track: &Track, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        self.lyrics_seq += 1;
        let ticket = LyricsTicket::new(self.lyrics_seq);
        self.state.lyrics.track_id = Some(track.id.clone());

        if let Some(lyrics) = self.state.cache.fresh_lyrics(&track.id, now).cloned() {
            debug!(track_id = %track.id, "Lyrics served from cache");
            self.state.lyrics.pending = None;
            self.state.lyrics.panel = LyricsPanel::Ready(lyrics);
            return;
        }

        self.state.lyrics.pending = Some(ticket);
        self.state.lyrics.panel = LyricsPanel::Loading;
        fx.push(Effect::FetchLyrics {
            ticket,
            track_id: track.id.clone(),
        });
    }

    fn lyrics_fetched(
        &mut self,
        ticket: LyricsTicket,
        track_id: &TrackId,
        result: ResolverResult<Lyrics>,
        now: DateTime<Utc>,
    ) {
        let is_active = self.state.active_track().map(|t| &t.id) == Some(track_id);
        if self.state.lyrics.pending != Some(ticket) || !is_active {
            debug!(track_id = %track_id, "Discarding lyrics for an inactive track");
            return;
        }
        self.state.lyrics.pending = None;

        self.state.lyrics.panel = match result {
            Ok(lyrics) => {
                if lyrics.text().is_some() {
                    self.state
                        .cache
                        .lyrics_mut()
                        .put_at(track_id.clone(), lyrics.clone(), now);
                }
                LyricsPanel::Ready(lyrics)
            }
            Err(e) => {
                warn!(track_id = %track_id, error = %e, "Lyrics unavailable");
                LyricsPanel::Failed
            }
        };
    }

    // ===== Transport Controls =====

    fn toggle_play(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        if self.state.active_track().is_none() {
            if self.state.session.is_loading() {
                return;
            }
            let start = match self.state.queue.current_index() {
                Some(index) => self.state.queue.jump_to(index).cloned(),
                None => self.state.queue.jump_to(0).cloned(),
            };
            match start {
                Ok(track) => self.start_load(track, now, fx),
                Err(_) => self.notify(Notification::warning("Queue is empty")),
            }
            return;
        }

        if let Err(e) = self.state.session.toggle() {
            warn!(error = %e, "Playback did not start");
            self.notify(Notification::error("Playback failed. Please try again."));
        }
    }

    fn navigate(&mut self, direction: Direction, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        match self.state.queue.advance(direction) {
            Ok(track) => {
                let track = track.clone();
                self.start_load(track, now, fx);
                fx.push(Effect::Persist);
            }
            Err(e) => self.notify_navigation(&e),
        }
    }

    fn notify_navigation(&mut self, error: &PlaybackError) {
        match error {
            PlaybackError::EndOfQueue | PlaybackError::StartOfQueue => {
                self.notify(Notification::info(error.to_string()));
            }
            PlaybackError::EmptyQueue => self.notify(Notification::warning("Queue is empty")),
            other => debug!(error = %other, "Navigation ignored"),
        }
    }

    fn toggle_shuffle(&mut self, fx: &mut Vec<Effect>) {
        if self.state.queue.toggle_shuffle() {
            self.notify(Notification::success("Shuffle enabled"));
        } else {
            self.notify(Notification::info("Shuffle disabled"));
        }
        fx.push(Effect::Persist);
    }

    fn cycle_repeat(&mut self, fx: &mut Vec<Effect>) {
        let notification = match self.state.queue.cycle_repeat() {
            RepeatMode::One => Notification::success("Repeat one"),
            RepeatMode::All => Notification::success("Repeat all"),
            RepeatMode::Off => Notification::info("Repeat off"),
        };
        self.notify(notification);
        fx.push(Effect::Persist);
    }

    fn step_volume(&mut self, delta: i32, fx: &mut Vec<Effect>) {
        self.state.session.adjust_volume(delta);
        let level = self.state.session.volume().level();
        self.notify(Notification::info(format!("Volume: {level}%")));
        fx.push(Effect::Persist);
    }

    fn toggle_mute(&mut self, fx: &mut Vec<Effect>) {
        if self.state.session.toggle_mute() {
            self.notify(Notification::info("Muted"));
        } else {
            let level = self.state.session.volume().level();
            self.notify(Notification::info(format!("Volume: {level}%")));
        }
        fx.push(Effect::Persist);
    }

    fn toggle_like(&mut self, track: &Track, fx: &mut Vec<Effect>) {
        let message = if self.state.liked.toggle(track) {
            Notification::success(format!("Added \"{}\" to Liked Songs", track.title))
        } else {
            Notification::info(format!("Removed \"{}\" from Liked Songs", track.title))
        };
        self.notify(message);
        fx.push(Effect::Persist);
    }

    // ===== Queue =====

    fn enqueue(&mut self, track: Track, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        match self.state.queue.enqueue(track.clone()) {
            Ok(was_empty) => {
                self.notify(Notification::success(format!(
                    "Added \"{}\" to queue",
                    track.title
                )));
                fx.push(Effect::Persist);

                let idle =
                    self.state.active_track().is_none() && !self.state.session.is_loading();
                if was_empty && idle {
                    self.start_load(track, now, fx);
                }
            }
            Err(e) => self.notify(Notification::warning(e.to_string())),
        }
    }

    fn remove_from_queue(&mut self, index: usize, fx: &mut Vec<Effect>) {
        let removal = match self.state.queue.remove_at(index) {
            Ok(removal) => removal,
            Err(e) => {
                debug!(index, error = %e, "Ignoring removal outside the queue");
                return;
            }
        };

        let id = &removal.track.id;
        if self.state.session.pending_track().map(|t| &t.id) == Some(id) {
            self.state.session.cancel_pending();
        }
        let is_active = self.state.active_track().map(|t| &t.id) == Some(id);
        if removal.removed_active && is_active {
            info!(track_id = %id, "Active track removed from queue, stopping");
            self.state.session.stop_and_clear();
            self.state.lyrics = Default::default();
        }

        self.notify(Notification::info(format!(
            "Removed \"{}\" from queue",
            removal.track.title
        )));
        fx.push(Effect::Persist);
    }

    fn clear_queue(&mut self, fx: &mut Vec<Effect>) {
        if self.state.queue.is_empty() {
            self.notify(Notification::info("Queue is already empty"));
            return;
        }
        self.state.session.cancel_pending();
        let keep = self.state.active_track().cloned();
        self.state.queue.clear(keep);
        self.notify(Notification::success("Queue cleared"));
        fx.push(Effect::Persist);
    }

    fn save_queue_as_playlist(&mut self, name: &str, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        if self.state.queue.is_empty() {
            self.notify(Notification::warning("Queue is empty"));
            return;
        }

        let name = if name.trim().is_empty() {
            format!("Queue {}", now.format("%Y-%m-%d"))
        } else {
            name.trim().to_string()
        };

        match Playlist::from_tracks(&name, self.state.queue.tracks()) {
            Ok(playlist) => {
                self.state.playlists.push(playlist);
                self.notify(Notification::success(format!("Playlist \"{name}\" created")));
                fx.push(Effect::Persist);
            }
            Err(e) => self.notify(Notification::warning(e.to_string())),
        }
    }

    // ===== Playlists =====

    /// Resolve a playlist by id, then by name
    fn find_playlist(&self, key: &str) -> Option<PlaylistId> {
        let key = key.trim();
        self.state
            .playlists
            .get(&PlaylistId::new(key))
            .or_else(|| self.state.playlists.find_by_name(key))
            .map(|playlist| playlist.id.clone())
    }

    fn add_current_to_playlist(&mut self, key: &str, fx: &mut Vec<Effect>) {
        let Some(track) = self.state.active_track().cloned() else {
            self.notify(Notification::warning("No track is playing"));
            return;
        };
        if self.state.playlists.is_empty() {
            self.notify(Notification::warning("Create a playlist first"));
            return;
        }
        let Some(id) = self.find_playlist(key) else {
            self.notify(Notification::warning(format!(
                "No playlist named \"{}\"",
                key.trim()
            )));
            return;
        };

        match self.state.playlists.add_track(&id, track) {
            Ok(playlist) => {
                let message = format!("Added to \"{}\"", playlist.name);
                self.notify(Notification::success(message));
                fx.push(Effect::Persist);
            }
            Err(CadenceError::Duplicate(_)) => {
                self.notify(Notification::info("Track already in playlist"));
            }
            Err(e) => self.notify(Notification::warning(e.to_string())),
        }
    }

    fn view_playlist(&mut self, key: &str) {
        let Some(playlist) = self
            .find_playlist(key)
            .and_then(|id| self.state.playlists.get(&id))
        else {
            self.notify(Notification::warning(format!(
                "No playlist named \"{}\"",
                key.trim()
            )));
            return;
        };

        let name = playlist.name.clone();
        self.state.search.results = playlist.tracks.clone();
        self.state.search.source = Some(ResultsSource::Playlist { name: name.clone() });
        self.state.search.pending = None;
        self.notify(Notification::info(format!("Viewing playlist: {name}")));
    }

    // ===== Settings =====

    fn set_theme(&mut self, theme: Theme, fx: &mut Vec<Effect>) {
        self.state.theme = theme;
        self.notify(Notification::success(format!("Theme: {theme}")));
        fx.push(Effect::Persist);
    }

    fn clear_cache(&mut self, fx: &mut Vec<Effect>) {
        self.state.reset();
        self.state.session.cancel_pending();
        self.state.search.pending = None;
        info!("Caches and saved preferences cleared");
        self.notify(Notification::success("Cache cleared successfully"));
        fx.push(Effect::ResetStore);
        fx.push(Effect::Persist);
    }

    // ===== Transport Callbacks =====

    fn track_ended(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        match self
            .state
            .session
            .on_natural_completion(&mut self.state.queue)
        {
            Completion::Restarted => debug!("Repeating track"),
            Completion::Advance(track) => {
                self.start_load(track, now, fx);
                fx.push(Effect::Persist);
            }
            Completion::Stopped => debug!("Playback finished"),
        }
    }

    fn playback_failed(&mut self, reason: &str, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        warn!(reason, "Playback error");
        self.notify(Notification::error(
            "Error playing audio. Trying next track...",
        ));
        match self
            .state
            .session
            .on_playback_error(&mut self.state.queue)
        {
            Ok(track) => {
                self.start_load(track, now, fx);
                fx.push(Effect::Persist);
            }
            Err(e) => self.notify_navigation(&e),
        }
    }
}

/// Keep only the last `Persist`; the snapshot is taken when it runs
fn collapse_persists(fx: &mut Vec<Effect>) {
    let Some(last) = fx.iter().rposition(|e| matches!(e, Effect::Persist)) else {
        return;
    };
    let mut index = 0;
    fx.retain(|e| {
        let keep = index == last || !matches!(e, Effect::Persist);
        index += 1;
        keep
    });
}

fn ignore_seek(result: cadence_playback::Result<()>) {
    if let Err(e) = result {
        debug!(error = %e, "Seek ignored");
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
