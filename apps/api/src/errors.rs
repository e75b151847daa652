use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::FailureKind;
use crate::roster::RosterError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// No roster data: the file was missing, undecodable or malformed at startup.
    #[error("Roster unavailable: {message}")]
    RosterUnavailable { code: &'static str, message: String },

    /// The generation service could not produce an answer.
    #[error("LLM error ({kind:?}): {message}")]
    Llm { kind: FailureKind, message: String },
}

impl From<&RosterError> for AppError {
    fn from(e: &RosterError) -> Self {
        AppError::RosterUnavailable {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl AppError {
    fn llm_status_and_code(kind: FailureKind) -> (StatusCode, &'static str) {
        match kind {
            FailureKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "LLM_SERVICE_UNAVAILABLE")
            }
            FailureKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "LLM_RATE_LIMITED"),
            FailureKind::AuthenticationFailed => {
                (StatusCode::BAD_GATEWAY, "LLM_AUTHENTICATION_FAILED")
            }
            FailureKind::MalformedBackendResponse => {
                (StatusCode::BAD_GATEWAY, "LLM_MALFORMED_RESPONSE")
            }
            FailureKind::Unknown => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RosterUnavailable { code, message } => {
                tracing::error!("Roster unavailable: {message}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    *code,
                    "No roster data is available. Check the roster file and restart.".to_string(),
                )
            }
            AppError::Llm { kind, message } => {
                if kind.is_transient() {
                    tracing::warn!("LLM unavailable ({kind:?}): {message}");
                } else {
                    tracing::error!("LLM error ({kind:?}): {message}");
                }
                let (status, code) = Self::llm_status_and_code(*kind);
                let message = match kind {
                    FailureKind::RateLimited => {
                        "The recommendation service is busy. Try again shortly."
                    }
                    FailureKind::ServiceUnavailable => {
                        "Could not reach the recommendation service."
                    }
                    _ => "The recommendation service returned an error.",
                };
                (status, code, message.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
