//! Error types for the signup gatekeeper.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Gatekeeper error types.
///
/// `BotDetected` and `DuplicateDevice` are policy rejections, not faults;
/// they still travel as errors so the handler maps every outcome at one
/// boundary.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Identity lookup failed: {0}")]
    IdentityLookup(String),

    #[error("Bot detected, account creation denied")]
    BotDetected,

    #[error("An account already exists for this device")]
    DuplicateDevice,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        // Upstream and storage details go to the log, not the client.
        let (status, code, message) = match &self {
            GateError::MissingField(_) => {
                (StatusCode::BAD_REQUEST, "MISSING_FIELD", self.to_string())
            }
            GateError::BotDetected => (StatusCode::FORBIDDEN, "BOT_DETECTED", self.to_string()),
            GateError::DuplicateDevice => {
                (StatusCode::TOO_MANY_REQUESTS, "DUPLICATE_DEVICE", self.to_string())
            }
            GateError::IdentityLookup(detail) => {
                error!(detail = %detail, "Identity lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IDENTITY_LOOKUP_FAILED",
                    "Identity lookup failed".to_string(),
                )
            }
            GateError::Storage(detail) => {
                error!(detail = %detail, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage failure".to_string(),
                )
            }
            GateError::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<identity_client::IdentityError> for GateError {
    fn from(e: identity_client::IdentityError) -> Self {
        GateError::IdentityLookup(e.to_string())
    }
}

impl From<sqlx::Error> for GateError {
    fn from(e: sqlx::Error) -> Self {
        GateError::Storage(e.to_string())
    }
}
