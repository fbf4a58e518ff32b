//! Test translators: scripted and failing `Translator` implementations.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use colore_core::error::ProviderError;
use colore_core::translation::Translator;

/// A translator that answers every request with `"[{lang}] {text}"` and
/// counts calls.
#[derive(Debug)]
pub struct ScriptedTranslator {
    name: String,
    calls: AtomicUsize,
}

impl ScriptedTranslator {
    /// Creates a translator reporting `name` as its provider name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `translate` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{target_lang}] {text}"))
    }
}

/// A translator that always fails and counts calls.
#[derive(Debug)]
pub struct FailingTranslator {
    name: String,
    calls: AtomicUsize,
}

impl FailingTranslator {
    /// Creates a failing translator reporting `name` as its provider name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `translate` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FailingTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::RequestFailed("HTTP 503".into()))
    }
}
