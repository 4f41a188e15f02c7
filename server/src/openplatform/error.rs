//! HTTP error mapping for push endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::dispatcher::DispatchError;
use super::handlers::HandlerError;
use super::receiver::PushError;

/// Errors surfaced by the push endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Push(#[from] PushError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Push(PushError::Unauthenticated) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Push(PushError::ForeignComponent(_)) => (StatusCode::FORBIDDEN, "FOREIGN_COMPONENT"),
            Self::Push(PushError::Malformed(_)) => (StatusCode::BAD_REQUEST, "MALFORMED_PUSH"),
            Self::Dispatch(DispatchError::UnknownEventType(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_EVENT_TYPE")
            }
            Self::Dispatch(DispatchError::Handler(
                HandlerError::MissingField(_) | HandlerError::InvalidField { .. },
            )) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_EVENT"),
            Self::Dispatch(DispatchError::Handler(HandlerError::Rejected(_))) => {
                (StatusCode::CONFLICT, "EVENT_REJECTED")
            }
        };

        tracing::warn!(status = status.as_u16(), code, error = %self, "Push refused");

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for push endpoints.
pub type ApiResult<T> = Result<T, ApiError>;
