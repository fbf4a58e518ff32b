//! Text-generation provider abstraction.

use async_trait::async_trait;

use crate::error::ProviderError;

/// A language-model service that continues the shared story.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates narrative text for a fully built prompt.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network failure, timeout, a non-success
    /// response, or a malformed payload.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
