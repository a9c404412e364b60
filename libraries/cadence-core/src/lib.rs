//! Cadence Core
//!
//! Domain types, collaborator traits, and error handling shared by every
//! Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `LikedSongs`, `SearchHistory`, `Theme`
//! - **Collaborator Traits**: `Resolver` (search, audio, lyrics) and `PreferenceStore`
//! - **Error Handling**: `CadenceError`, `ResolverError`, and `Result`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{LikedSongs, Playlist, Track};
//!
//! let track = Track::new("abc", "Intro", "The Band");
//!
//! let mut liked = LikedSongs::new();
//! assert!(liked.toggle(&track));
//!
//! let mut playlist = Playlist::new("Road Trip").unwrap();
//! playlist.add_track(track).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, ResolverError, Result};
pub use traits::{PreferenceStore, Resolver, ResolverResult};

pub use types::{
    LikedSongs, Lyrics, Playlist, PlaylistId, PlaylistLibrary, SearchHistory, Theme, Track,
    TrackId,
};
