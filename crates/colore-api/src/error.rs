//! CoLore API: error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use colore_translation::error::TranslationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message returned when every translation provider failed.
pub const UNAVAILABLE_MESSAGE: &str =
    "Translation services are currently unavailable. Please try again later.";

/// Message returned for unexpected failures such as an unreadable body.
pub const INTERNAL_MESSAGE: &str = "Translation service temporarily unavailable";

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Extra context, present only for provider outages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A translation failure.
    Translation(TranslationError),
    /// The request body could not be read as JSON.
    MalformedBody(String),
}

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        Self::Translation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Translation(TranslationError::Validation(message)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            Self::Translation(TranslationError::AllProvidersFailed { details }) => {
                error!(%details, "all translation services failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        error: UNAVAILABLE_MESSAGE.to_owned(),
                        details: Some(details),
                    },
                )
            }
            Self::MalformedBody(reason) => {
                error!(%reason, "translation request could not be read");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: INTERNAL_MESSAGE.to_owned(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ApiError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(TranslationError::Validation("bad input".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_all_providers_failed_maps_to_503() {
        assert_eq!(
            status_of(
                TranslationError::AllProvidersFailed {
                    details: "Both A and B failed".into()
                }
                .into()
            ),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_malformed_body_maps_to_500() {
        assert_eq!(
            status_of(ApiError::MalformedBody("expected value".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_details_are_omitted_when_absent() {
        let body = ErrorBody {
            error: "nope".into(),
            details: None,
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, serde_json::json!({ "error": "nope" }));
    }
}
