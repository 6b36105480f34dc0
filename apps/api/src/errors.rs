use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::humanizer::HumanizerError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is a per-request failure — nothing here is fatal to the
/// process. Credits are never charged on any error path.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u32, available: u32 },

    #[error("Humanizer error: {0}")]
    Humanizer(#[from] HumanizerError),

    #[error("Humanization job failed: {0}")]
    JobFailed(String),

    #[error("Humanization timed out for document {document_id}")]
    PollTimeout { document_id: String },

    /// Humanization succeeded but the project could not be persisted.
    /// Carries the humanized text and document id so the work is not lost.
    #[error("Failed to save project: {message}")]
    SaveFailed {
        message: String,
        humanized_content: String,
        document_id: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::InsufficientCredits {
                required,
                available,
            } => (
                StatusCode::PAYMENT_REQUIRED,
                "INSUFFICIENT_CREDITS",
                format!(
                    "Insufficient credits: {required} required, {available} available \
                     (short by {}). Please upgrade your plan or purchase more credits.",
                    required.saturating_sub(*available)
                ),
            ),
            AppError::Humanizer(e) => {
                tracing::error!("Humanizer error: {e}");
                // The remote diagnostic is surfaced verbatim — "insufficient
                // remote credits" vs "invalid key" matters to the operator.
                (StatusCode::BAD_GATEWAY, "HUMANIZER_ERROR", e.to_string())
            }
            AppError::JobFailed(msg) => {
                tracing::error!("Humanization job failed: {msg}");
                (StatusCode::BAD_GATEWAY, "JOB_FAILED", msg.clone())
            }
            AppError::PollTimeout { document_id } => (
                StatusCode::GATEWAY_TIMEOUT,
                "POLL_TIMEOUT",
                format!(
                    "Humanization timed out; the outcome of document {document_id} is unknown. \
                     No credits were charged. Keep the document id for reconciliation."
                ),
            ),
            AppError::SaveFailed { message, .. } => {
                tracing::error!("Project save failed after successful humanization: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SAVE_FAILED",
                    "Humanization succeeded but the project could not be saved".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        // SaveFailed returns the humanized text in the error body — it only
        // exists in memory at this point and the caller must not lose it.
        let body = match self {
            AppError::SaveFailed {
                humanized_content,
                document_id,
                ..
            } => Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "humanized_content": humanized_content,
                    "humanization_document_id": document_id
                }
            })),
            _ => Json(json!({
                "error": {
                    "code": code,
                    "message": message
                }
            })),
        };

        (status, body).into_response()
    }
}
