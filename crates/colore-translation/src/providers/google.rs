//! Google's keyless `translate_a/single` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use colore_core::error::ProviderError;
use colore_core::translation::Translator;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;

use super::{client_with_timeout, send_error, status_error};

/// Endpoint queried for translations.
pub const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Request timeout.
pub const GOOGLE_TIMEOUT: Duration = Duration::from_secs(8);

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Google Translate client.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl GoogleTranslate {
    /// Creates a client for `endpoint`.
    #[must_use]
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            client: client_with_timeout(timeout),
            endpoint: endpoint.to_owned(),
            timeout,
        }
    }

    /// Creates a client for the public endpoint.
    #[must_use]
    pub fn public() -> Self {
        Self::new(GOOGLE_ENDPOINT, GOOGLE_TIMEOUT)
    }
}

/// The reply is nested arrays; `data[0]` holds one `[translated, source, ..]`
/// entry per sentence.
fn extract_text(data: &Value) -> Result<String, ProviderError> {
    let invalid = || ProviderError::InvalidResponse("Invalid response format from Google Translate".into());

    let sentences = data.get(0).and_then(Value::as_array).ok_or_else(invalid)?;
    let first = sentences
        .first()
        .and_then(|s| s.get(0))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if first.is_empty() {
        return Err(invalid());
    }

    Ok(sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl Translator for GoogleTranslate {
    fn name(&self) -> &str {
        "Google Translate"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;

        if let Some(error) = status_error(&response) {
            return Err(error);
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        extract_text(&data)
    }
}
