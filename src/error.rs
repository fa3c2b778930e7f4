//! Error types for the summarization service
//!
//! Provides unified error handling using thiserror.
//!
//! Quota exhaustion is intentionally not represented here: an exhausted
//! quota is a normal decision returned by the tracker, and the API layer
//! translates it into a 429 response with its own body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Digest Error Enum ==
/// Unified error type for the summarization service.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream content processor failed or was abandoned
    #[error("Summarization failed: {0}")]
    Upstream(String),

    /// Backing store I/O failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Cache state could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for DigestError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DigestError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DigestError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            DigestError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            DigestError::Serialization(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            DigestError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the summarization service.
pub type Result<T> = std::result::Result<T, DigestError>;
