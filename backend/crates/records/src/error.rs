//! Record Error Types
//!
//! This module provides record-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::UpstreamError;
use thiserror::Error;

/// Record-specific result type alias
pub type RecordResult<T> = Result<T, RecordError>;

/// Record-specific error variants
#[derive(Debug, Error)]
pub enum RecordError {
    /// Row missing or owned by someone else
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Path id is not a UUID
    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    /// Row API unreachable, failing, or refusing the request
    #[error("Record backend error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecordError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordError::NotFound(_) => StatusCode::NOT_FOUND,
            RecordError::InvalidId(_) => StatusCode::BAD_REQUEST,
            RecordError::Upstream(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
                StatusCode::UNAUTHORIZED
            }
            RecordError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RecordError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::NotFound(_) => ErrorKind::NotFound,
            RecordError::InvalidId(_) => ErrorKind::BadRequest,
            RecordError::Upstream(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
                ErrorKind::Unauthorized
            }
            RecordError::Upstream(_) => ErrorKind::BadGateway,
            RecordError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            RecordError::Upstream(_) | RecordError::Internal(_) => {
                AppError::new(self.kind(), "Something went wrong")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            RecordError::Upstream(e) => {
                tracing::error!(error = %e, "Record backend error");
            }
            RecordError::Internal(msg) => {
                tracing::error!(message = %msg, "Record internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Record error");
            }
        }
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for RecordError {
    fn from(err: AppError) -> Self {
        RecordError::Internal(err.to_string())
    }
}
