//! Cadence Resolver Client
//!
//! HTTP binding of [`cadence_core::Resolver`] for the relay API.
//!
//! # Features
//!
//! - **Search**: `GET {base}/search?q=..&searchEngine=..`
//! - **Audio sources**: `GET {base}/song?id=..` (route configurable)
//! - **Lyrics**: `GET {base}/lyrics?id=..`
//!
//! Every answer is wrapped in `{ "success": bool, "data": ... }`. Items are
//! validated here, and timeouts surface as `ResolverError::UpstreamTimeout`.
//!
//! # Example
//!
//! ```ignore
//! use cadence_client::{HttpResolver, ResolverConfig};
//! use cadence_core::{Resolver, TrackId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = HttpResolver::new(ResolverConfig::default())?;
//!
//!     let tracks = resolver.search("monsoon", "gaama").await?;
//!     if let Some(track) = tracks.first() {
//!         let url = resolver.resolve_audio(&track.id).await?;
//!         println!("{} -> {}", track.title, url);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::HttpResolver;
pub use error::{ClientError, Result};
pub use types::{
    ResolverConfig, DEFAULT_BASE_URL, DEFAULT_ENGINE, DEFAULT_TIMEOUT, MAX_TIMEOUT, MIN_TIMEOUT,
    SEARCH_ENGINES,
};
