//! Runtime tests
//!
//! The full loop: dispatch, spawned resolver calls (mocked), answers fed back
//! as events, snapshot persistence, and view publication.

use async_trait::async_trait;
use cadence_core::{Lyrics, Resolver, ResolverError, ResolverResult, Track, TrackId};
use cadence_playback::{PlaybackConfig, PlaybackSession};
use cadence_player::{
    AppEvent, AppState, ControlSteps, Controller, HeadlessTransport, Notification, Runtime,
    Surface, ViewModel, ViewSynchronizer,
};
use cadence_storage::{MemoryPreferenceStore, PersistedState};
use mockall::mock;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mock! {
    pub Relay {}

    #[async_trait]
    impl Resolver for Relay {
        async fn search(&self, query: &str, engine: &str) -> ResolverResult<Vec<Track>>;
        async fn resolve_audio(&self, id: &TrackId) -> ResolverResult<String>;
        async fn fetch_lyrics(&self, id: &TrackId) -> ResolverResult<Lyrics>;
    }
}

// ===== Test Helpers =====

fn create_track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id), "Artist")
}

/// Relay answering every call successfully
fn happy_relay() -> MockRelay {
    let mut relay = MockRelay::new();
    relay
        .expect_search()
        .returning(|_, _| Ok(vec![create_track("a"), create_track("b")]));
    relay
        .expect_resolve_audio()
        .returning(|id| Ok(format!("https://cdn.example.com/{}.mp3", id.as_str())));
    relay
        .expect_fetch_lyrics()
        .returning(|id| Ok(Lyrics::from_text(format!("words of {}", id.as_str()))));
    relay
}

struct Recorder(Arc<Mutex<Vec<ViewModel>>>);

impl Surface for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn render(&mut self, view: &ViewModel) {
        self.0.lock().unwrap().push(view.clone());
    }
}

fn runtime_with(
    resolver: Arc<dyn Resolver>,
    store: Arc<MemoryPreferenceStore>,
    surfaces: Vec<Box<dyn Surface>>,
) -> Runtime {
    let config = PlaybackConfig::default();
    let session = PlaybackSession::new(Box::new(HeadlessTransport::new()), &config);
    let controller = Controller::new(
        AppState::new(session, &config, "gaama"),
        ControlSteps::default(),
    );

    let mut sync = ViewSynchronizer::new();
    for surface in surfaces {
        sync.register(surface);
    }

    Runtime::new(controller, resolver, store, sync, Duration::from_secs(5))
}

fn runtime(resolver: MockRelay, store: Arc<MemoryPreferenceStore>) -> Runtime {
    runtime_with(Arc::new(resolver), store, Vec::new())
}

// =============================================================================
// Search & Playback
// =============================================================================

#[tokio::test]
async fn test_search_results_reach_the_view() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut rt = runtime(happy_relay(), Arc::clone(&store));

    rt.handle(AppEvent::Search("monsoon".into())).await;
    assert_eq!(rt.in_flight(), 1);
    assert!(rt.view().unwrap().searching);

    rt.settle().await;

    let view = rt.view().unwrap();
    assert_eq!(view.results.len(), 2);
    assert!(!view.searching);
    assert_eq!(store.value("searchHistory"), Some(json!(["monsoon"])));
}

#[tokio::test]
async fn test_play_result_loads_track_and_lyrics() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut rt = runtime(happy_relay(), Arc::clone(&store));

    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::PlayResult(1)).await;
    rt.settle().await;

    let view = rt.view().unwrap();
    assert_eq!(view.active_title(), Some("Track b"));
    assert!(view.is_playing);
    assert_eq!(view.lyrics.as_deref(), Some("words of b"));
    assert_eq!(rt.in_flight(), 0);

    assert_eq!(store.value("currentQueueIndex"), Some(json!(1)));
    let persisted = PersistedState::load(store.as_ref(), 70).await.unwrap();
    assert_eq!(persisted.queue.len(), 2);
    assert_eq!(persisted.recently_played, vec![create_track("b")]);
}

#[tokio::test]
async fn test_enqueue_on_empty_queue_autoloads() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut rt = runtime(happy_relay(), store);

    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::EnqueueResult(0)).await;
    rt.settle().await;

    let view = rt.view().unwrap();
    assert_eq!(view.active_title(), Some("Track a"));
    assert_eq!(view.queue.len(), 1);
    assert!(view.queue[0].active);
}

#[tokio::test]
async fn test_resolution_failure_notifies() {
    let mut relay = MockRelay::new();
    relay
        .expect_search()
        .returning(|_, _| Ok(vec![create_track("gone")]));
    relay
        .expect_resolve_audio()
        .returning(|id| Err(ResolverError::NotFound(id.as_str().to_string())));
    relay.expect_fetch_lyrics().never();

    let mut rt = runtime(relay, Arc::new(MemoryPreferenceStore::new()));
    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::PlayResult(0)).await;
    rt.settle().await;

    let view = rt.view().unwrap();
    assert!(view.now_playing.is_none());
    assert_eq!(
        view.notifications,
        vec![Notification::error("Failed to play Track gone")]
    );
}

// =============================================================================
// Timeouts
// =============================================================================

/// Relay that never answers within any sane timeout
struct StalledRelay;

#[async_trait]
impl Resolver for StalledRelay {
    async fn search(&self, _query: &str, _engine: &str) -> ResolverResult<Vec<Track>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn resolve_audio(&self, _id: &TrackId) -> ResolverResult<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(String::new())
    }

    async fn fetch_lyrics(&self, _id: &TrackId) -> ResolverResult<Lyrics> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Lyrics::Missing)
    }
}

#[tokio::test(start_paused = true)]
async fn test_search_timeout_keeps_history() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut rt = runtime_with(Arc::new(StalledRelay), Arc::clone(&store), Vec::new());

    rt.handle(AppEvent::Search("slow song".into())).await;
    rt.settle().await;

    let view = rt.view().unwrap();
    assert_eq!(view.recent_searches, vec!["slow song".to_string()]);
    assert!(!view.searching);
    assert_eq!(
        view.notifications,
        vec![Notification::warning("Search timed out. Please try again.")]
    );
    assert_eq!(store.value("searchHistory"), Some(json!(["slow song"])));
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_store_failures_do_not_interrupt() {
    let store = Arc::new(MemoryPreferenceStore::new());
    store.set_reject_writes(true);
    let mut rt = runtime(happy_relay(), Arc::clone(&store));

    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::PlayResult(0)).await;
    rt.settle().await;

    assert_eq!(rt.view().unwrap().active_title(), Some("Track a"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_clear_cache_rewrites_store_with_defaults() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut rt = runtime(happy_relay(), Arc::clone(&store));

    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::LikeResult(0)).await;
    rt.handle(AppEvent::CreatePlaylist("Mine".into())).await;
    assert_eq!(store.value("likedSongs").unwrap().as_array().unwrap().len(), 1);

    rt.handle(AppEvent::ClearCache).await;

    assert_eq!(store.value("likedSongs"), Some(json!([])));
    assert_eq!(store.value("searchHistory"), Some(json!([])));
    let persisted = PersistedState::load(store.as_ref(), 70).await.unwrap();
    assert_eq!(persisted.playlists.len(), 3);
}

// =============================================================================
// Views & Progress
// =============================================================================

#[tokio::test]
async fn test_all_surfaces_agree_on_like_state() {
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));
    let mut rt = runtime_with(
        Arc::new(happy_relay()),
        Arc::new(MemoryPreferenceStore::new()),
        vec![
            Box::new(Recorder(Arc::clone(&first))) as Box<dyn Surface>,
            Box::new(Recorder(Arc::clone(&second))),
        ],
    );

    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::PlayResult(0)).await;
    rt.settle().await;
    rt.handle(AppEvent::LikeCurrent).await;

    let first = first.lock().unwrap();
    let second = second.lock().unwrap();
    assert_eq!(*first, *second);

    let last = first.last().unwrap();
    assert!(last.now_playing.as_ref().unwrap().liked);
    assert!(last.queue[0].liked);
    assert!(last.results[0].liked);
    assert_eq!(last.liked_count, 1);
}

#[tokio::test]
async fn test_progress_ticks_until_track_end() {
    let mut rt = runtime(happy_relay(), Arc::new(MemoryPreferenceStore::new()));
    assert!(rt.progress_event(Duration::from_secs(1)).is_none());

    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::PlayResult(0)).await;
    rt.settle().await;

    // No duration from upstream: the fallback length applies
    assert_eq!(
        rt.progress_event(Duration::from_secs(1)),
        Some(AppEvent::Progress {
            position: 1.0,
            total: 30.0
        })
    );

    rt.handle(AppEvent::Progress {
        position: 29.5,
        total: 30.0,
    })
    .await;
    assert_eq!(
        rt.progress_event(Duration::from_secs(1)),
        Some(AppEvent::TrackEnded)
    );

    rt.handle(AppEvent::TrackEnded).await;
    rt.settle().await;
    assert_eq!(rt.view().unwrap().active_title(), Some("Track b"));
}

#[tokio::test]
async fn test_non_finite_seek_keeps_the_clock_running() {
    let mut rt = runtime(happy_relay(), Arc::new(MemoryPreferenceStore::new()));
    rt.handle(AppEvent::Search("q".into())).await;
    rt.settle().await;
    rt.handle(AppEvent::PlayResult(0)).await;
    rt.settle().await;

    rt.handle(AppEvent::SeekTo(f64::NAN)).await;
    assert_eq!(rt.controller().state().session.position_seconds(), 0.0);

    let mut ended = false;
    for _ in 0..40 {
        match rt.progress_event(Duration::from_secs(1)) {
            Some(AppEvent::TrackEnded) => {
                ended = true;
                break;
            }
            Some(event) => rt.handle(event).await,
            None => break,
        }
    }
    assert!(ended);
}

#[tokio::test]
async fn test_run_stops_when_input_closes() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let rt = runtime(happy_relay(), Arc::clone(&store));

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tx.send(AppEvent::SetVolume(42)).unwrap();
    drop(tx);

    rt.run(rx, Duration::from_secs(1)).await;

    assert_eq!(store.value("volume"), Some(json!("42")));
}
