//! Effect runtime
//!
//! One task owns the [`Controller`] and handles one event at a time:
//! - dispatch the event
//! - run the returned effects (collaborator calls are spawned; store writes
//!   are awaited in order)
//! - publish the view to every surface
//!
//! Collaborator answers re-enter through an unbounded channel as events, so
//! they are handled exactly like user input.

use crate::controller::Controller;
use crate::effects::Effect;
use crate::events::AppEvent;
use crate::sync::{ViewModel, ViewSynchronizer};
use cadence_core::{PreferenceStore, Resolver, ResolverError, ResolverResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Track length assumed when neither upstream nor the transport reports one
pub const FALLBACK_TRACK_SECONDS: f64 = 30.0;

pub struct Runtime {
    controller: Controller,
    resolver: Arc<dyn Resolver>,
    store: Arc<dyn PreferenceStore>,
    sync: ViewSynchronizer,
    call_timeout: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    in_flight: usize,
}

impl Runtime {
    pub fn new(
        controller: Controller,
        resolver: Arc<dyn Resolver>,
        store: Arc<dyn PreferenceStore>,
        sync: ViewSynchronizer,
        call_timeout: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            resolver,
            store,
            sync,
            call_timeout,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn view(&self) -> Option<&ViewModel> {
        self.sync.last_view()
    }

    /// Collaborator calls still running
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Draw the initial view
    pub fn publish(&mut self) {
        self.sync.publish(self.controller.state());
    }

    /// Handle one event to completion (spawned calls excepted)
    pub async fn handle(&mut self, event: AppEvent) {
        if event.is_completion() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        let effects = self.controller.dispatch(event);
        for effect in effects {
            self.execute(effect).await;
        }

        self.sync.publish(self.controller.state());
    }

    /// Handle collaborator answers until no call is outstanding
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(event) => self.handle(event).await,
                None => break,
            }
        }
    }

    /// Run until `input` closes
    ///
    /// `tick` drives simulated playback progress.
    pub async fn run(mut self, mut input: mpsc::UnboundedReceiver<AppEvent>, tick: Duration) {
        self.publish();

        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                Some(event) = self.rx.recv() => self.handle(event).await,
                event = input.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                _ = ticker.tick() => {
                    if let Some(event) = self.progress_event(tick) {
                        self.handle(event).await;
                    }
                }
            }
        }

        debug!("Input closed, runtime stopping");
        self.persist().await;
    }

    /// Event produced by `elapsed` seconds of simulated playback
    pub fn progress_event(&self, elapsed: Duration) -> Option<AppEvent> {
        let session = &self.controller.state().session;
        if !session.is_playing() || session.active_track().is_none() {
            return None;
        }

        let total = match session.total_seconds() {
            total if total > 0.0 => total,
            _ => FALLBACK_TRACK_SECONDS,
        };
        let position = session.position_seconds() + elapsed.as_secs_f64();

        if position >= total {
            Some(AppEvent::TrackEnded)
        } else {
            Some(AppEvent::Progress { position, total })
        }
    }

    async fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Search {
                ticket,
                query,
                engine,
            } => {
                let resolver = Arc::clone(&self.resolver);
                let (q, e) = (query.clone(), engine.clone());
                self.spawn_call(
                    async move { resolver.search(&q, &e).await },
                    move |result| AppEvent::SearchCompleted {
                        ticket,
                        query,
                        engine,
                        result,
                    },
                );
            }
            Effect::ResolveAudio { ticket, track_id } => {
                let resolver = Arc::clone(&self.resolver);
                self.spawn_call(
                    async move { resolver.resolve_audio(&track_id).await },
                    move |result| AppEvent::AudioResolved { ticket, result },
                );
            }
            Effect::FetchLyrics { ticket, track_id } => {
                let resolver = Arc::clone(&self.resolver);
                let id = track_id.clone();
                self.spawn_call(
                    async move { resolver.fetch_lyrics(&id).await },
                    move |result| AppEvent::LyricsFetched {
                        ticket,
                        track_id,
                        result,
                    },
                );
            }
            Effect::Persist => self.persist().await,
            Effect::ResetStore => {
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "Failed to clear preference store");
                }
            }
        }
    }

    /// Spawn a bounded collaborator call and feed its answer back as an event
    fn spawn_call<T, F, M>(&mut self, call: F, into_event: M)
    where
        T: Send + 'static,
        F: Future<Output = ResolverResult<T>> + Send + 'static,
        M: FnOnce(ResolverResult<T>) -> AppEvent + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        let timeout = self.call_timeout;

        tokio::spawn(async move {
            let result = tokio::time::timeout(timeout, call)
                .await
                .unwrap_or_else(|_| Err(ResolverError::UpstreamTimeout));
            // The receiver lives as long as the runtime
            let _ = tx.send(into_event(result));
        });
    }

    async fn persist(&self) {
        let snapshot = self.controller.snapshot();
        if let Err(e) = snapshot.save(self.store.as_ref()).await {
            warn!(error = %e, "Failed to persist preferences");
        }
    }
}
