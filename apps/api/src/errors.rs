use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::analysis::normalizer::NormalizeError;
use crate::analysis::schema::Violation;
use crate::llm_client::LlmError;

/// Application-level error type covering the full failure taxonomy.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every kind is terminal for the current request — nothing is retried or
/// locally recovered, and no partial result is ever returned as if complete.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed user input. Raised before any provider call.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The completion call failed or timed out.
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    /// The completion text could not be coerced into JSON even after repair.
    #[error("Parse failure: {0}")]
    ParseFailure(#[from] NormalizeError),

    /// Parsed JSON does not match the required schema.
    #[error("Analysis response failed schema validation ({} violation(s))", .0.len())]
    ValidationFailure(Vec<Violation>),

    /// The store operation failed after a successful analysis.
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Provider(e) => {
                tracing::error!("Provider error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI provider request failed".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::ParseFailure(NormalizeError::Unrecoverable { cleaned, source }) => {
                // The cleaned text is diagnostics only — log it, never return it.
                tracing::error!(
                    "Parse failure: {source}; cleaned text (first 500 chars): {}",
                    cleaned.chars().take(500).collect::<String>()
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process AI response. Please try again.".to_string(),
                    None,
                )
            }
            AppError::ValidationFailure(violations) => {
                tracing::error!("Validation failure: {violations:?}");
                let listed = violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI response did not match the expected analysis schema".to_string(),
                    Some(listed),
                )
            }
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store analysis result".to_string(),
                    None,
                )
            }
        };

        let mut body = Map::new();
        body.insert("error".to_string(), json!(message));
        if let Some(details) = details {
            body.insert("details".to_string(), json!(details));
        }

        (status, Json(Value::Object(body))).into_response()
    }
}
