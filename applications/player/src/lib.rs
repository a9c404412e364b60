//! Cadence Player Library
//!
//! Headless music player built on the Cadence engine: one state object, a
//! typed event dispatcher, an effect runtime on tokio, and terminal surfaces
//! kept in sync from a single view projection.
//!
//! # Architecture
//!
//! - **State**: [`AppState`] owns the queue, session, caches, and preferences
//! - **Dispatch**: [`Controller::dispatch`] applies one [`AppEvent`] and
//!   returns [`Effect`]s; it never performs I/O
//! - **Runtime**: [`Runtime`] performs effects, feeds collaborator answers
//!   back as events, persists snapshots, and publishes the view
//! - **Views**: [`ViewSynchronizer`] renders one [`ViewModel`] onto every
//!   [`Surface`]
//!
//! This library exposes the components for the `cadence` binary and tests.

pub mod commands;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod events;
pub mod notifications;
pub mod runtime;
pub mod state;
pub mod surfaces;
pub mod sync;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::PlayerConfig;
pub use controller::{ControlSteps, Controller};
pub use effects::{Effect, LyricsTicket, SearchTicket};
pub use error::{PlayerError, Result};
pub use events::AppEvent;
pub use notifications::{Notification, NotificationKind};
pub use runtime::Runtime;
pub use state::AppState;
pub use surfaces::{Panel, TerminalSurface};
pub use sync::{Surface, ViewModel, ViewSynchronizer};
pub use transport::HeadlessTransport;
