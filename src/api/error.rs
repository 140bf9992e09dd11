//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::consult::ConsultError;
use crate::gateway::GatewayError;
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
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("A reply is already pending for this session")]
    Busy,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Session closed")]
    SessionClosed,
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Reply timed out")]
    Timeout,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Busy => (
                StatusCode::CONFLICT,
                "BUSY",
                "A reply is already pending for this session".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::SessionClosed => (
                StatusCode::GONE,
                "SESSION_CLOSED",
                "Session was discarded while the request was in flight".to_string(),
            ),
            ApiError::Upstream(detail) => {
                tracing::warn!(%detail, "Upstream gateway error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM",
                    "The assistant backend is unavailable".to_string(),
                )
            }
            ApiError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "The assistant did not reply in time".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
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

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Busy => ApiError::Busy,
            SessionError::EmptyMessage | SessionError::MessageTooLong { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            SessionError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<ConsultError> for ApiError {
    fn from(err: ConsultError) -> Self {
        match err {
            ConsultError::Session(e) => e.into(),
            ConsultError::Gateway(e) => e.into(),
            ConsultError::TimedOut(_) => ApiError::Timeout,
            ConsultError::Cancelled => ApiError::SessionClosed,
            ConsultError::EmptyBatch => {
                ApiError::BadRequest("Upload batch contains no files".into())
            }
        }
    }
}
