use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    /// Business-rule rejection of an admin acting on their own account.
    SelfAction(String),

    Unauthorized(String),

    Forbidden(String),

    /// Database or other backing-store failure. `detail` is populated only
    /// when the handler runs in development mode; production responses stay
    /// generic.
    UpstreamFailure {
        message: String,
        detail: Option<String>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::SelfAction(msg) => write!(f, "Rejected: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::UpstreamFailure { message, .. } => write!(f, "Upstream failure: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::ValidationError(msg) | ApiError::SelfAction(msg) => {
                (StatusCode::BAD_REQUEST, msg, None)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::UpstreamFailure { message, detail } => {
                tracing::error!(
                    error = detail.as_deref().unwrap_or("unavailable"),
                    "{message}"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, message, detail)
            }
        };

        if status.is_client_error() {
            tracing::debug!(status = %status, "{message}");
        }

        let body = ApiResponse::<()>::failure(message, detail);
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    /// Wraps a backing-store failure. `message` is the user-facing text;
    /// the raw error is attached only when `development_mode` is true —
    /// the flag comes in explicitly rather than from ambient process state.
    pub fn upstream(message: &str, err: impl fmt::Display, development_mode: bool) -> Self {
        ApiError::UpstreamFailure {
            message: message.to_string(),
            detail: development_mode.then(|| err.to_string()),
        }
    }
}
