use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::classify::ErrorKind;
use crate::generation::retry::GenerationFailure;

/// Every way a single generation attempt can fail, from input validation
/// through transport to response extraction.
///
/// Display strings matter here: the classifier (`generation::classify`)
/// matches substrings of these messages, so wording changes must be checked
/// against the classification table.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("LLM gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("expected tool call was not returned by the model")]
    MissingToolCall,

    #[error("tool call arguments could not be parsed as valid JSON: {0}")]
    MalformedArguments(String),

    #[error("AI generated empty content")]
    EmptyContent,

    #[error("{0}")]
    InvalidDocument(String),

    #[error("invalid cover letter: {0}")]
    InvalidLetter(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, "NOT_FOUND", &msg),
            AppError::Validation(msg) => {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", &msg)
            }
            AppError::Generation(failure) => {
                tracing::error!(
                    "Generation failed after {} attempt(s): {}",
                    failure.attempts,
                    failure.error.message
                );
                let status = match failure.error.kind {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::Auth => StatusCode::UNAUTHORIZED,
                    ErrorKind::Quota => StatusCode::TOO_MANY_REQUESTS,
                    ErrorKind::Network | ErrorKind::Ai | ErrorKind::Unknown => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                let body = Json(json!({
                    "error": {
                        "code": "GENERATION_ERROR",
                        "kind": failure.error.kind,
                        "message": failure.error.message,
                        "suggestion": failure.error.suggestion,
                        "retryable": failure.error.retryable,
                        "attempts": failure.attempts
                    }
                }));
                (status, body).into_response()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                )
            }
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = Json(json!({
        "error": {
            "code": code,
            "message": message
        }
    }));
    (status, body).into_response()
}
