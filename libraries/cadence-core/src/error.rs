//! Core error types for Cadence

use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Failure reported by the resolver collaborator
///
/// Raw transport errors never cross this boundary; every client maps its
/// failures onto one of these kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// Network or upstream failure, including malformed payloads
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The call exceeded its bounded timeout
    #[error("Upstream timed out")]
    UpstreamTimeout,

    /// Upstream has no such item
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResolverError {
    /// Create an upstream-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }
}

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Preference store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resolver collaborator failure
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CadenceError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate entry error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
