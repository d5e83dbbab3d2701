//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::market::MarketError;
use crate::session::SessionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// The drug lookup failed. `message` is the localized generic text.
    #[error("Drug lookup failed")]
    LookupFailed { message: String },
    #[error("Drug lookup is not configured")]
    LookupUnavailable,
    #[error("Marketplace upstream error: {0}")]
    Upstream(String),
    #[error("Session limit reached")]
    SessionLimit,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::LookupFailed { message } => {
                (StatusCode::BAD_GATEWAY, "LOOKUP_FAILED", message.clone())
            }
            ApiError::LookupUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LOOKUP_UNAVAILABLE",
                "Drug lookup is not configured on this server".to_string(),
            ),
            ApiError::Upstream(detail) => {
                tracing::warn!(detail, "Marketplace upstream error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM",
                    "Marketplace service unavailable".to_string(),
                )
            }
            ApiError::SessionLimit => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_LIMIT",
                "Too many open sessions, try again later".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::NotFound { entity, .. } => {
                ApiError::NotFound(entity.not_found_message().to_string())
            }
            MarketError::Upstream(detail) => ApiError::Upstream(detail),
            MarketError::Fixture(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => ApiError::NotFound("Session not found".into()),
            SessionError::Full(_) => ApiError::SessionLimit,
            SessionError::LockPoisoned => ApiError::Internal("session lock poisoned".into()),
        }
    }
}
