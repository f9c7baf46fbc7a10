//! API error types with JSON responses.
//!
//! Only request-level failures become HTTP errors. Per-item failures travel
//! as protocol status codes inside a successful response.

use addrspace_store::SpaceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Address space error (500).
    ///
    /// The batch services report per-item failures in their results, so the
    /// only space error that reaches a handler is a poisoned lock.
    #[error("address space error: {0}")]
    Space(#[from] SpaceError),
}

impl ApiError {
    /// A request whose item list is empty.
    pub fn nothing_to_do(field: &str) -> Self {
        Self::BadRequest(format!("nothing to do: {field} is empty"))
    }

    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Space(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Space(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Error code (e.g., "BAD_REQUEST", "INTERNAL_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_poisoned_is_500() {
        let err = ApiError::from(SpaceError::LockPoisoned);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_nothing_to_do() {
        let err = ApiError::nothing_to_do("nodes_to_read");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "bad request: nothing to do: nodes_to_read is empty");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::from(SpaceError::LockPoisoned).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::nothing_to_do("nodes_to_add").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
