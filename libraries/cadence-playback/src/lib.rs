//! Cadence - Playback Engine
//!
//! Platform-agnostic playback state for Cadence.
//!
//! This crate provides:
//! - Playback queue (cursor, shuffle with original-order restore, repeat modes)
//! - Playback session (load/resolve split, transport control, completion policy)
//! - Track cache (search results, audio sources, lyrics; time-based staleness)
//! - Volume control (0-100%, mute/unmute with restore)
//! - Recently played (bounded, most recent first)
//!
//! # Architecture
//!
//! `cadence-playback` performs no I/O:
//! - No dependency on the HTTP resolver client
//! - No dependency on cadence-storage (database)
//! - No async runtime
//!
//! Audio output is provided via the [`AudioTransport`] trait, and resolution is
//! driven by the caller through [`LoadStep::Resolve`] tickets.
//!
//! # Example: Queue Navigation
//!
//! ```rust
//! use cadence_core::Track;
//! use cadence_playback::{Direction, PlaybackError, Queue, RepeatMode};
//!
//! let mut queue = Queue::new();
//! queue
//!     .set_queue(
//!         vec![
//!             Track::new("a", "Track A", "Artist"),
//!             Track::new("b", "Track B", "Artist"),
//!         ],
//!         0,
//!     )
//!     .unwrap();
//!
//! assert_eq!(queue.advance(Direction::Next).unwrap().id.as_str(), "b");
//! assert_eq!(queue.advance(Direction::Next), Err(PlaybackError::EndOfQueue));
//!
//! queue.set_repeat(RepeatMode::All);
//! assert_eq!(queue.advance(Direction::Next).unwrap().id.as_str(), "a");
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust
//! use cadence_playback::{AudioTransport, PlaybackConfig, PlaybackSession, Result};
//!
//! struct MyOutput;
//!
//! impl AudioTransport for MyOutput {
//!     fn set_source(&mut self, _url: &str) -> Result<()> {
//!         Ok(())
//!     }
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn seek(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _percent: u8) {}
//! }
//!
//! let session = PlaybackSession::new(Box::new(MyOutput), &PlaybackConfig::default());
//! assert_eq!(session.volume().level(), 70);
//! ```

mod cache;
mod error;
mod history;
mod queue;
mod session;
mod shuffle;
mod transport;
pub mod types;
mod volume;

// Public exports
pub use cache::{CacheEntry, CacheTable, SearchKey, TrackCache};
pub use error::{PlaybackError, Result};
pub use history::RecentlyPlayed;
pub use queue::{Queue, Removal};
pub use session::{Completion, LoadStep, LoadTicket, Loaded, PlaybackSession};
pub use shuffle::shuffle_around;
pub use transport::AudioTransport;
pub use types::{Direction, PlaybackConfig, RepeatMode};
pub use volume::{Volume, VolumeIcon};
