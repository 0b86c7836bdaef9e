//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::chat::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Session with the given ID was not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Request body or parameters are invalid
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session registry is full
    #[error("Too many sessions: {0}")]
    Unavailable(String),

    /// Session actor stopped while handling the request
    #[error("Session error: {0}")]
    SessionError(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => AppError::SessionNotFound(id),
            SessionError::CapacityReached(_) => AppError::Unavailable(err.to_string()),
            SessionError::ActorStopped(_) => AppError::SessionError(err.to_string()),
        }
    }
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::SessionError(_) => StatusCode::GONE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_mapping() {
        let err: AppError = SessionError::NotFound("abc".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Session not found: abc");

        let err: AppError = SessionError::CapacityReached(10).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: AppError = SessionError::ActorStopped("abc".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::GONE);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
