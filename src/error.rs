//! Domain-specific error types for seo-audit

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Fixed user-facing message for any fetch or processing failure.
/// Original error detail goes to server-side logs only.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to analyze site. The site may be blocking this tool, or the URL may be invalid.";

/// Main error type for the seo-audit server
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Fetch error: {message}")]
    Fetch { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for AuditError {
    fn from(err: anyhow::Error) -> Self {
        AuditError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        AuditError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AuditError {
    fn from(err: reqwest::Error) -> Self {
        AuditError::Fetch {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Map errors onto the HTTP boundary: validation failures carry their own
/// message with a 4xx; everything else collapses into one generic 500.
impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuditError::Validation { message } => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            other => {
                tracing::error!("audit request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": FETCH_FAILED_MESSAGE }),
                )
            }
        };
        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for seo-audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
