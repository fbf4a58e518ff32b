//! Ollama narrator using the native `/api/generate` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use colore_core::error::ProviderError;
use colore_core::generation::TextGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default Ollama base URL.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default model.
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral";

/// Default request timeout. Local models can be slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaNarrator {
    client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaNarrator {
    /// Creates a narrator talking to `base_url` with `model`.
    #[must_use]
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT)
    }

    /// Creates a narrator with a custom request timeout.
    #[must_use]
    pub fn with_timeout(base_url: &str, model: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
            timeout,
        }
    }

    /// Creates a narrator from `OLLAMA_BASE_URL` and `OLLAMA_MODEL`, falling
    /// back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("OLLAMA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OLLAMA_BASE_URL.to_owned());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_owned());
        Self::new(&base_url, &model)
    }

    /// The endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl Default for OllamaNarrator {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
    response
        .response
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("no response field in the result".into()))
}

#[async_trait]
impl TextGenerator for OllamaNarrator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        extract_text(body)
    }
}
