//! HTTP resolver backed by the relay API.

use crate::error::{ClientError, Result};
use crate::types::{Envelope, ResolverConfig, WireTrack, MAX_TIMEOUT, MIN_TIMEOUT};
use async_trait::async_trait;
use cadence_core::types::{Lyrics, Track, TrackId};
use cadence_core::{Resolver, ResolverResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Resolver talking to a relay over HTTP.
///
/// Every request is bounded by the configured timeout. Failures are mapped
/// onto [`cadence_core::ResolverError`] at the trait boundary, so callers
/// never see raw transport errors.
///
/// # Example
///
/// ```ignore
/// use cadence_client::{HttpResolver, ResolverConfig};
/// use cadence_core::Resolver;
///
/// let resolver = HttpResolver::new(ResolverConfig::new("http://localhost:3000/api"))?;
/// let tracks = resolver.search("lofi", "gaama").await?;
/// println!("Found {} tracks", tracks.len());
/// ```
pub struct HttpResolver {
    http: Client,
    base_url: Url,
    audio_route: String,
}

impl HttpResolver {
    /// Create a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        if config.timeout < MIN_TIMEOUT || config.timeout > MAX_TIMEOUT {
            return Err(ClientError::InvalidConfig(format!(
                "timeout must be between {}s and {}s",
                MIN_TIMEOUT.as_secs(),
                MAX_TIMEOUT.as_secs()
            )));
        }

        let route = config.audio_route.trim_matches('/');
        if route.is_empty() {
            return Err(ClientError::InvalidConfig(
                "audio route cannot be empty".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(5)))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            audio_route: route.to_string(),
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Search the relay catalogue.
    pub async fn search_tracks(&self, query: &str, engine: &str) -> Result<Vec<Track>> {
        let envelope: Envelope<Vec<WireTrack>> = self
            .get_json("search", &[("q", query), ("searchEngine", engine)])
            .await?;

        if !envelope.success {
            return Err(ClientError::ServerError {
                status: 200,
                message: envelope
                    .message
                    .unwrap_or_else(|| "relay reported failure".into()),
            });
        }

        let items = envelope
            .data
            .ok_or_else(|| ClientError::ParseError("search response has no data".into()))?;

        let total = items.len();
        let tracks = items
            .into_iter()
            .map(WireTrack::into_track)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ClientError::ParseError("search item without id or title".into()))?;

        debug!(query, engine, results = total, "Search completed");
        Ok(tracks)
    }

    /// Resolve a track to a playable source URL.
    pub async fn audio_source(&self, id: &TrackId) -> Result<String> {
        let params = [("id", id.as_str())];
        let envelope: Envelope<String> = match self.get_json(&self.audio_route, &params).await {
            Err(ClientError::ServerError { status: 404, .. }) => {
                return Err(ClientError::NotFound(id.to_string()));
            }
            other => other?,
        };

        match envelope.data {
            Some(url) if envelope.success && !url.trim().is_empty() => {
                debug!(track_id = %id, "Resolved audio source");
                Ok(url.trim().to_string())
            }
            _ => Err(ClientError::NotFound(id.to_string())),
        }
    }

    /// Fetch lyrics; an empty or negative answer is [`Lyrics::Missing`].
    pub async fn lyrics(&self, id: &TrackId) -> Result<Lyrics> {
        let envelope: Envelope<String> = match self.get_json("lyrics", &[("id", id.as_str())]).await
        {
            Err(ClientError::ServerError { status: 404, .. }) => return Ok(Lyrics::Missing),
            other => other?,
        };

        Ok(match envelope.data {
            Some(text) if envelope.success => Lyrics::from_text(text),
            _ => Lyrics::Missing,
        })
    }

    fn endpoint(&self, route: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(route)
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        params: &[(&str, &str)],
    ) -> Result<Envelope<T>> {
        let url = self.endpoint(route, params)?;
        debug!(url = %url, "Relay request");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(ClientError::from_transport)?;

        serde_json::from_str(&body).map_err(|e| {
            ClientError::ParseError(format!("Failed to parse {route} response: {e}"))
        })
    }
}

/// Validate the base URL and make it joinable (trailing slash).
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidConfig("URL cannot be empty".into()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ClientError::InvalidConfig(
            "URL must start with http:// or https://".into(),
        ));
    }
    Url::parse(&format!("{trimmed}/")).map_err(|e| ClientError::InvalidConfig(e.to_string()))
}

#[async_trait]
impl Resolver for HttpResolver {
    async fn search(&self, query: &str, engine: &str) -> ResolverResult<Vec<Track>> {
        self.search_tracks(query, engine).await.map_err(|e| {
            warn!(query, engine, error = %e, "Search failed");
            e.into()
        })
    }

    async fn resolve_audio(&self, id: &TrackId) -> ResolverResult<String> {
        self.audio_source(id).await.map_err(|e| {
            warn!(track_id = %id, error = %e, "Audio resolution failed");
            e.into()
        })
    }

    async fn fetch_lyrics(&self, id: &TrackId) -> ResolverResult<Lyrics> {
        self.lyrics(id).await.map_err(|e| {
            warn!(track_id = %id, error = %e, "Lyrics fetch failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:3000/api//").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/");
    }

    #[test]
    fn endpoint_encodes_query() {
        let resolver = HttpResolver::new(ResolverConfig::default()).unwrap();
        let url = resolver
            .endpoint("search", &[("q", "rock & roll"), ("searchEngine", "wynk")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/search?q=rock+%26+roll&searchEngine=wynk"
        );
    }
}
