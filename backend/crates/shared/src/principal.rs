//! Caller identity
//!
//! The session gateway resolves the signed-in user once per request and
//! stores a [`Principal`] in the request extensions. Record handlers take it
//! as an extractor: every row read or write they issue is scoped by
//! `user_id` and authenticated with `access_token`.

use std::fmt;

use crate::id::UserId;

/// Signed-in caller for the current request.
#[derive(Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Bearer token forwarded to the row API so row-level security applies.
    pub access_token: String,
}

impl Principal {
    pub fn new(user_id: UserId, email: Option<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            email,
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(feature = "axum")]
mod extract {
    use std::convert::Infallible;

    use axum::extract::{FromRequestParts, OptionalFromRequestParts};
    use http::request::Parts;

    use super::Principal;
    use crate::error::app_error::AppError;

    /// Rejects with 401 when the gateway resolved no user.
    impl<S> FromRequestParts<S> for Principal
    where
        S: Send + Sync,
    {
        type Rejection = AppError;

        async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
            parts
                .extensions
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Unauthorized"))
        }
    }

    impl<S> OptionalFromRequestParts<S> for Principal
    where
        S: Send + Sync,
    {
        type Rejection = Infallible;

        async fn from_request_parts(
            parts: &mut Parts,
            _state: &S,
        ) -> Result<Option<Self>, Self::Rejection> {
            Ok(parts.extensions.get::<Principal>().cloned())
        }
    }
}
