//! Error types for the resolver client.

use cadence_core::ResolverError;
use thiserror::Error;

/// Errors that can occur when talking to the relay.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Relay is offline or unreachable
    #[error("Relay unreachable: {0}")]
    Unreachable(String),

    /// Relay returned a non-success status
    #[error("Relay error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Relay has no such item
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid relay URL or configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Response body did not match the relay envelope
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Classify a transport error the way callers need it
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Unreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl From<ClientError> for ResolverError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Timeout => Self::UpstreamTimeout,
            ClientError::NotFound(id) => Self::NotFound(id),
            other => Self::UpstreamUnavailable(other.to_string()),
        }
    }
}

/// Result type for resolver client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
