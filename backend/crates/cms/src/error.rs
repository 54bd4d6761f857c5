//! CMS Error Types
//!
//! This module provides CMS-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// CMS-specific result type alias
pub type CmsResult<T> = Result<T, CmsError>;

/// CMS-specific error variants
#[derive(Debug, Error)]
pub enum CmsError {
    /// No post with this slug
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Entry exists but its frontmatter is missing or malformed
    #[error("Invalid post {slug}: {message}")]
    Frontmatter { slug: String, message: String },

    /// Content directory could not be read
    #[error("Content read error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CmsError::NotFound(_) => StatusCode::NOT_FOUND,
            CmsError::Frontmatter { .. } | CmsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CmsError::NotFound(_) => ErrorKind::NotFound,
            CmsError::Frontmatter { .. } | CmsError::Io(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            CmsError::NotFound(_) => AppError::new(self.kind(), "Post not found"),
            _ => AppError::new(self.kind(), "Failed to load post"),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            CmsError::NotFound(slug) => {
                tracing::debug!(slug = %slug, "Post not found");
            }
            CmsError::Frontmatter { slug, message } => {
                tracing::warn!(slug = %slug, message = %message, "Invalid post frontmatter");
            }
            CmsError::Io(e) => {
                tracing::error!(error = %e, "Content read error");
            }
        }
    }
}

impl IntoResponse for CmsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
