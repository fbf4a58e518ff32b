//! Translation error types.

use thiserror::Error;

/// Errors returned by the translation chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The request was rejected before any provider was called.
    #[error("{0}")]
    Validation(String),

    /// Every provider in the chain failed.
    #[error("translation providers failed: {details}")]
    AllProvidersFailed {
        /// Which providers were tried.
        details: String,
    },
}
