//! Translation endpoint.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use colore_translation::domain::language;
use colore_translation::domain::request::TranslationRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/translate.
///
/// Fields are read as raw JSON so a non-string value is reported as a
/// validation failure instead of a decoding error.
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequestBody {
    /// Text to translate.
    #[serde(default)]
    pub text: Option<Value>,
    /// Target language code.
    #[serde(default, rename = "targetLang")]
    pub target_lang: Option<Value>,
}

/// Response body for a successful translation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    /// The translated text.
    pub translated_text: String,
    /// The text as submitted.
    pub source_text: String,
    /// The requested target language.
    pub target_language: String,
    /// Name of the provider that answered.
    pub provider: String,
}

/// Response body for GET /api/translate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInfoResponse {
    /// Service banner.
    pub message: &'static str,
    /// Target language codes accepted by the service.
    pub supported_languages: Vec<&'static str>,
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// POST /api/translate
#[instrument(skip(state, payload))]
async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequestBody>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(body) = payload?;
    let request = TranslationRequest::new(string_field(body.text), string_field(body.target_lang))?;

    info!(
        target_lang = request.target_lang(),
        chars = request.text().chars().count(),
        "handling translation request"
    );

    let outcome = state.translator.translate(&request).await?;

    Ok(Json(TranslateResponse {
        translated_text: outcome.translated_text,
        source_text: request.text().to_owned(),
        target_language: request.target_lang().to_owned(),
        provider: outcome.provider,
    }))
}

/// GET /api/translate
async fn translate_info() -> Json<TranslateInfoResponse> {
    Json(TranslateInfoResponse {
        message: "Translation API is running",
        supported_languages: language::supported_codes(),
    })
}

/// Returns the router for the translation endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/translate", post(translate).get(translate_info))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use colore_translation::application::fallback::FallbackTranslator;
    use colore_test_support::{FailingTranslator, ScriptedTranslator};
    use tower::ServiceExt;

    fn app_with(state: AppState) -> Router {
        router().with_state(state)
    }

    fn post_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/translate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_translate_returns_200() {
        // Arrange
        let translator = Arc::new(ScriptedTranslator::new("LibreTranslate"));
        let state = AppState::new(Arc::new(FallbackTranslator::new(vec![translator.clone()])));
        let app = app_with(state);

        // Act
        let response = app
            .oneshot(post_request(r#"{"text":"hello","targetLang":"es"}"#))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(translator.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_string_text_returns_400() {
        let translator = Arc::new(ScriptedTranslator::new("LibreTranslate"));
        let state = AppState::new(Arc::new(FallbackTranslator::new(vec![translator.clone()])));

        let response = app_with(state)
            .oneshot(post_request(r#"{"text":42,"targetLang":"es"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_failing_chain_returns_503() {
        let state = AppState::new(Arc::new(FallbackTranslator::new(vec![Arc::new(
            FailingTranslator::new("LibreTranslate"),
        )])));

        let response = app_with(state)
            .oneshot(post_request(r#"{"text":"hello","targetLang":"es"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_500() {
        let state = AppState::new(Arc::new(FallbackTranslator::new(vec![])));

        let response = app_with(state)
            .oneshot(post_request("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
