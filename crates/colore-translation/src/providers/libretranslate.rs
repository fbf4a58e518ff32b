//! LibreTranslate over a list of public instances.

use std::time::Duration;

use async_trait::async_trait;
use colore_core::error::ProviderError;
use colore_core::translation::Translator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{client_with_timeout, send_error, status_error};

/// Public instances, tried in order.
pub const LIBRETRANSLATE_INSTANCES: [&str; 3] = [
    "https://libretranslate.de/translate",
    "https://translate.argosopentech.com/translate",
    "https://libretranslate.com/translate",
];

/// Timeout for each instance.
pub const LIBRETRANSLATE_TIMEOUT: Duration = Duration::from_secs(10);

/// LibreTranslate client that falls through its instances until one answers.
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    client: Client,
    instances: Vec<String>,
    timeout: Duration,
}

impl LibreTranslate {
    /// Creates a client over the given instance URLs.
    #[must_use]
    pub fn new(instances: Vec<String>, timeout: Duration) -> Self {
        Self {
            client: client_with_timeout(timeout),
            instances,
            timeout,
        }
    }

    /// Creates a client over the public instances.
    #[must_use]
    pub fn public() -> Self {
        Self::new(
            LIBRETRANSLATE_INSTANCES.iter().map(|s| (*s).to_owned()).collect(),
            LIBRETRANSLATE_TIMEOUT,
        )
    }

    /// Instance URLs in the order they are tried.
    #[must_use]
    pub fn instances(&self) -> &[String] {
        &self.instances
    }

    async fn translate_with(
        &self,
        instance: &str,
        text: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let body = TranslateBody {
            q: text,
            source: "auto",
            target: target_lang,
            format: "text",
        };

        let response = self
            .client
            .post(instance)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;

        if let Some(error) = status_error(&response) {
            return Err(error);
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        extract_text(parsed)
    }
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

fn extract_text(response: TranslateResponse) -> Result<String, ProviderError> {
    response
        .translated_text
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("no translatedText in response".into()))
}

#[async_trait]
impl Translator for LibreTranslate {
    fn name(&self) -> &str {
        "LibreTranslate"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError> {
        for instance in &self.instances {
            debug!(instance, "trying LibreTranslate instance");
            match self.translate_with(instance, text, target_lang).await {
                Ok(translated) => return Ok(translated),
                Err(error) => warn!(instance, %error, "LibreTranslate instance failed"),
            }
        }
        Err(ProviderError::Unavailable(
            "All LibreTranslate instances failed".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = TranslateBody {
            q: "hello",
            source: "auto",
            target: "es",
            format: "text",
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "q": "hello", "source": "auto", "target": "es", "format": "text" })
        );
    }

    #[test]
    fn test_extract_text_reads_translated_text() {
        let parsed: TranslateResponse =
            serde_json::from_str(r#"{"translatedText":"hola","detectedLanguage":{"language":"en"}}"#)
                .unwrap();

        assert_eq!(extract_text(parsed).unwrap(), "hola");
    }

    #[test]
    fn test_extract_text_rejects_missing_field() {
        let parsed: TranslateResponse = serde_json::from_str(r#"{"error":"busy"}"#).unwrap();

        assert!(matches!(
            extract_text(parsed),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_instances_report_unavailable() {
        // Arrange
        let provider = LibreTranslate::new(
            vec![
                "http://127.0.0.1:9/translate".to_owned(),
                "http://127.0.0.1:9/other".to_owned(),
            ],
            Duration::from_secs(2),
        );

        // Act
        let result = provider.translate("hello", "es").await;

        // Assert
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }

    #[test]
    fn test_public_instances_in_order() {
        let provider = LibreTranslate::public();

        assert_eq!(provider.instances()[0], "https://libretranslate.de/translate");
        assert_eq!(provider.instances().len(), 3);
    }
}
