//! Domain types for Cadence

mod ids;
mod liked;
mod lyrics;
mod playlist;
mod search_history;
mod theme;
mod track;

pub use ids::{PlaylistId, TrackId};
pub use liked::LikedSongs;
pub use lyrics::Lyrics;
pub use playlist::{Playlist, PlaylistLibrary, DEFAULT_PLAYLISTS};
pub use search_history::{SearchHistory, MAX_RECENT_SEARCHES};
pub use theme::Theme;
pub use track::{format_time, Track, PLACEHOLDER_IMAGE, UNKNOWN_ARTIST};
