use axum::extract::rejection::JsonRejection;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::domain::DomainError;

pub const RAG_UNAVAILABLE_DETAIL: &str =
    "RAG service is unavailable (check database/model initialization).";
pub const RAG_FAILED_DETAIL: &str = "Internal server error during RAG process.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("RAG service unavailable")]
    RagUnavailable,

    /// The inner error is for logs only; the response body is fixed.
    #[error("RAG processing failed: {0}")]
    RagFailed(#[from] DomainError),

    #[error("invalid request: {message}")]
    Validation { status: StatusCode, message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ApiError::RagUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                RAG_UNAVAILABLE_DETAIL.to_string(),
            ),
            ApiError::RagFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RAG_FAILED_DETAIL.to_string(),
            ),
            ApiError::Validation { status, message } => (status, message),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
