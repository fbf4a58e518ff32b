//! Provider fallback chain.
//!
//! Providers are tried in order; the first success wins and its name is
//! reported back. Failures are logged and never surfaced individually.

use std::fmt;
use std::sync::Arc;

use colore_core::translation::Translator;
use tracing::{info, warn};

use crate::domain::request::TranslationRequest;
use crate::error::TranslationError;
use crate::providers::{GoogleTranslate, LibreTranslate};

/// A successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    /// The translated text.
    pub translated_text: String,
    /// Name of the provider that produced it.
    pub provider: String,
}

/// Tries each provider in turn until one succeeds.
pub struct FallbackTranslator {
    providers: Vec<Arc<dyn Translator>>,
}

impl fmt::Debug for FallbackTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackTranslator")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl FallbackTranslator {
    /// Creates a chain over `providers`, tried in the given order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn Translator>>) -> Self {
        Self { providers }
    }

    /// The public chain: LibreTranslate instances first, then Google.
    #[must_use]
    pub fn public() -> Self {
        Self::new(vec![
            Arc::new(LibreTranslate::public()),
            Arc::new(GoogleTranslate::public()),
        ])
    }

    /// Provider names in the order they are tried.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Translates a validated request.
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::AllProvidersFailed` when no provider
    /// produced a translation.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationOutcome, TranslationError> {
        for provider in &self.providers {
            match provider
                .translate(request.text(), request.target_lang())
                .await
            {
                Ok(translated_text) => {
                    info!(provider = provider.name(), target = request.target_lang(), "translation succeeded");
                    return Ok(TranslationOutcome {
                        translated_text,
                        provider: provider.name().to_owned(),
                    });
                }
                Err(error) => {
                    warn!(provider = provider.name(), %error, "translation provider failed");
                }
            }
        }

        Err(TranslationError::AllProvidersFailed {
            details: failure_details(&self.provider_names()),
        })
    }
}

fn failure_details(names: &[&str]) -> String {
    match names {
        [] => "No translation providers are configured".to_owned(),
        [only] => format!("{only} failed"),
        [first, second] => format!("Both {first} and {second} failed"),
        [rest @ .., last] => format!("{} and {last} all failed", rest.join(", ")),
    }
}
