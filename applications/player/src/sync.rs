//! View synchronization
//!
//! After every dispatched event the whole [`AppState`] is projected into one
//! immutable [`ViewModel`], which is then rendered onto every registered
//! [`Surface`] before the next event is taken. Surfaces never read state
//! directly, so they cannot disagree about the active track or its like state.

use crate::notifications::Notification;
use crate::state::{AppState, LyricsPanel, ResultsSource};
use cadence_core::types::format_time;
use cadence_core::{Theme, Track};
use cadence_playback::{RepeatMode, VolumeIcon};

pub const NO_LYRICS: &str = "No lyrics available for this track.";
pub const LYRICS_FAILED: &str = "Failed to load lyrics.";
pub const LYRICS_LOADING: &str = "Loading lyrics...";

/// Active track as every surface shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub liked: bool,
}

/// One row of the queue list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRow {
    pub title: String,
    pub artist: String,
    pub active: bool,
    pub liked: bool,
}

/// One row of the results list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub title: String,
    pub artist: String,
    pub liked: bool,
    pub queued: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub name: String,
    pub track_count: usize,
}

/// Snapshot of everything a surface may display
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub now_playing: Option<NowPlaying>,
    /// Title of the track being resolved, if any
    pub loading: Option<String>,
    pub is_playing: bool,
    pub position: String,
    pub duration: String,
    /// 0.0-1.0
    pub progress: f64,
    pub volume: u8,
    pub volume_icon: VolumeIcon,
    pub muted: bool,
    pub shuffled: bool,
    pub repeat: RepeatMode,
    pub queue: Vec<QueueRow>,
    pub engine: String,
    pub results_title: String,
    pub results: Vec<ResultRow>,
    pub searching: bool,
    pub recent_searches: Vec<String>,
    pub liked_count: usize,
    pub playlists: Vec<PlaylistSummary>,
    pub lyrics: Option<String>,
    pub theme: Theme,
    pub notifications: Vec<Notification>,
}

impl ViewModel {
    /// Project the state
    pub fn project(state: &AppState) -> Self {
        let session = &state.session;
        let volume = session.volume();
        let active_id = state.active_track().map(|t| &t.id);

        let now_playing = state.active_track().map(|track| NowPlaying {
            id: track.id.as_str().to_string(),
            title: track.title.clone(),
            artist: track.artist_label().to_string(),
            image_url: track.image_or_placeholder().to_string(),
            liked: state.is_liked(&track.id),
        });

        let total = session.total_seconds();
        let progress = if total > 0.0 {
            (session.position_seconds() / total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let queue = state
            .queue
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| QueueRow {
                title: track.title.clone(),
                artist: track.artist_label().to_string(),
                active: state.queue.current_index() == Some(index)
                    && !matches!(active_id, Some(id) if id != &track.id),
                liked: state.is_liked(&track.id),
            })
            .collect();

        let results = state
            .search
            .results
            .iter()
            .map(|track| result_row(state, track))
            .collect();

        let results_title = match &state.search.source {
            Some(ResultsSource::Search { query, .. }) => format!("Results for \"{query}\""),
            Some(ResultsSource::Playlist { name }) => format!("Playlist: {name}"),
            None => "Search for a song".to_string(),
        };

        let lyrics = match &state.lyrics.panel {
            LyricsPanel::Empty => None,
            LyricsPanel::Loading => Some(LYRICS_LOADING.to_string()),
            LyricsPanel::Ready(lyrics) => {
                Some(lyrics.text().unwrap_or(NO_LYRICS).to_string())
            }
            LyricsPanel::Failed => Some(LYRICS_FAILED.to_string()),
        };

        Self {
            now_playing,
            loading: session.pending_track().map(|t| t.title.clone()),
            is_playing: session.is_playing(),
            position: format_time(session.position_seconds()),
            duration: format_time(total),
            progress,
            volume: volume.level(),
            volume_icon: volume.icon(),
            muted: volume.is_muted(),
            shuffled: state.queue.is_shuffled(),
            repeat: state.queue.repeat_mode(),
            queue,
            engine: state.engine.clone(),
            results_title,
            results,
            searching: state.search.is_loading(),
            recent_searches: state.search_history.iter().map(str::to_string).collect(),
            liked_count: state.liked.len(),
            playlists: state
                .playlists
                .iter()
                .map(|p| PlaylistSummary {
                    name: p.name.clone(),
                    track_count: p.len(),
                })
                .collect(),
            lyrics,
            theme: state.theme,
            notifications: state.notifications.clone(),
        }
    }

    /// Title of the active track
    pub fn active_title(&self) -> Option<&str> {
        self.now_playing.as_ref().map(|np| np.title.as_str())
    }
}

fn result_row(state: &AppState, track: &Track) -> ResultRow {
    ResultRow {
        title: track.title.clone(),
        artist: track.artist_label().to_string(),
        liked: state.is_liked(&track.id),
        queued: state.queue.position_of(&track.id).is_some(),
    }
}

/// A place the view is drawn
pub trait Surface: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Draw the view; called once per dispatched event
    fn render(&mut self, view: &ViewModel);
}

/// Fans one projection out to every surface
#[derive(Default)]
pub struct ViewSynchronizer {
    surfaces: Vec<Box<dyn Surface>>,
    last: Option<ViewModel>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, surface: Box<dyn Surface>) {
        tracing::debug!(surface = surface.name(), "Surface registered");
        self.surfaces.push(surface);
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Project `state` and render it everywhere
    pub fn publish(&mut self, state: &AppState) -> &ViewModel {
        let view = ViewModel::project(state);
        for surface in &mut self.surfaces {
            surface.render(&view);
        }
        self.last.insert(view)
    }

    /// The most recently published view
    pub fn last_view(&self) -> Option<&ViewModel> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::{AudioTransport, PlaybackConfig, PlaybackSession, Result};
    use std::sync::{Arc, Mutex};

    struct SilentTransport;

    impl AudioTransport for SilentTransport {
        fn set_source(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
        fn play(&mut self) -> Result<()> {
            Ok(())
        }
        fn pause(&mut self) {}
        fn stop(&mut self) {}
        fn seek(&mut self, _seconds: f64) {}
        fn set_volume(&mut self, _percent: u8) {}
    }

    fn state() -> AppState {
        let config = PlaybackConfig::default();
        let session = PlaybackSession::new(Box::new(SilentTransport), &config);
        AppState::new(session, &config, "gaama")
    }

    struct Recorder {
        name: &'static str,
        seen: Arc<Mutex<Vec<ViewModel>>>,
    }

    impl Surface for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn render(&mut self, view: &ViewModel) {
            self.seen.lock().unwrap().push(view.clone());
        }
    }

    #[test]
    fn empty_state_projection() {
        let view = ViewModel::project(&state());
        assert!(view.now_playing.is_none());
        assert_eq!(view.position, "0:00");
        assert_eq!(view.progress, 0.0);
        assert_eq!(view.volume, 70);
        assert_eq!(view.playlists.len(), 3);
        assert_eq!(view.results_title, "Search for a song");
        assert!(view.lyrics.is_none());
    }

    #[test]
    fn queue_rows_mark_liked_tracks() {
        let mut state = state();
        let a = Track::new("a", "Alpha", "X");
        let b = Track::new("b", "Beta", "");
        state.queue.set_queue(vec![a.clone(), b], 0).unwrap();
        state.liked.toggle(&a);

        let view = ViewModel::project(&state);
        assert_eq!(view.queue.len(), 2);
        assert!(view.queue[0].liked);
        assert!(view.queue[0].active);
        assert!(!view.queue[1].liked);
        assert_eq!(view.queue[1].artist, "Unknown Artist");
    }

    #[test]
    fn missing_lyrics_message() {
        let mut state = state();
        state.lyrics.panel = LyricsPanel::Ready(cadence_core::Lyrics::Missing);
        assert_eq!(ViewModel::project(&state).lyrics.as_deref(), Some(NO_LYRICS));

        state.lyrics.panel = LyricsPanel::Failed;
        assert_eq!(
            ViewModel::project(&state).lyrics.as_deref(),
            Some(LYRICS_FAILED)
        );
    }

    #[test]
    fn every_surface_gets_the_same_view() {
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));

        let mut sync = ViewSynchronizer::new();
        sync.register(Box::new(Recorder {
            name: "a",
            seen: seen_a.clone(),
        }));
        sync.register(Box::new(Recorder {
            name: "b",
            seen: seen_b.clone(),
        }));

        let state = state();
        sync.publish(&state);
        sync.publish(&state);

        let a = seen_a.lock().unwrap();
        let b = seen_b.lock().unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(*a, *b);
        assert_eq!(sync.last_view(), Some(&a[1]));
    }
}
