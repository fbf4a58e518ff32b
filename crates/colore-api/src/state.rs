//! Shared application state.

use std::sync::Arc;

use colore_translation::application::fallback::FallbackTranslator;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Translation provider chain.
    pub translator: Arc<FallbackTranslator>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(translator: Arc<FallbackTranslator>) -> Self {
        Self { translator }
    }
}
