//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::UpstreamError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Access or refresh token rejected by the auth backend
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Sign-in form missing a field
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Auth backend unreachable or failing
    #[error("Auth backend error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Map a backend failure for a token-bearing call: a 4xx means the
    /// backend refused the token, anything else is an outage.
    pub fn from_token_call(err: UpstreamError) -> Self {
        if err.is_rejection() {
            AuthError::SessionInvalid
        } else {
            AuthError::Upstream(err)
        }
    }

    /// The backend refused the credentials, as opposed to failing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::SessionInvalid | AuthError::InvalidCredentials)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::SessionInvalid | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
            AuthError::Upstream(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::SessionInvalid | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::MissingField(_) => ErrorKind::BadRequest,
            AuthError::Upstream(e) if e.is_unavailable() => ErrorKind::ServiceUnavailable,
            AuthError::Upstream(_) => ErrorKind::BadGateway,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // Do not leak backend detail to the browser
            AuthError::Upstream(_) => AppError::new(self.kind(), "Authentication service unavailable"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Upstream(e) => {
                tracing::error!(error = %e, "Auth backend error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Internal(format!("session encoding failed: {}", err))
    }
}
