//! Translation provider abstraction.

use async_trait::async_trait;

use crate::error::ProviderError;

/// A single translation backend. Fallback between several of these is
/// composed on top of this trait.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable provider name reported back to clients.
    fn name(&self) -> &str;

    /// Translates `text` into the language identified by `target_lang`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the backend fails or answers with an
    /// unusable payload.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError>;
}
