//! Error types shared by the capability traits.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by an external provider (text generation, translation).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider is not configured or not reachable at all.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The request was sent but the provider answered with a failure.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The provider answered but the payload could not be used.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider did not answer in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure reading or writing a persisted preference.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be used (missing directory, quota, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
