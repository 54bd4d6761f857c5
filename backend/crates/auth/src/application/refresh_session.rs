//! Refresh Session Use Case
//!
//! Turns the stored session cookie into a verified user, refreshing the
//! token pair first when it is about to expire. Never fails: every backend
//! problem is folded into the outcome.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::backend::AuthBackend;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::error::AuthError;

/// Result of resolving the session
#[derive(Debug)]
pub enum SessionOutcome {
    Authenticated { user: User, session: AuthSession },
    Unauthenticated,
    /// The auth backend could not answer; whether that signs the caller out
    /// is decided by the gateway's failure policy.
    UpstreamError(AuthError),
}

impl SessionOutcome {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionOutcome::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }
}

/// What to do with the session cookie on the way out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    Keep,
    Write(AuthSession),
    Clear,
}

#[derive(Debug)]
pub struct RefreshOutput {
    pub outcome: SessionOutcome,
    pub cookie: CookieUpdate,
}

impl RefreshOutput {
    fn new(outcome: SessionOutcome, cookie: CookieUpdate) -> Self {
        Self { outcome, cookie }
    }
}

/// Refresh session use case
pub struct RefreshSessionUseCase<B>
where
    B: AuthBackend,
{
    backend: Arc<B>,
    config: Arc<AuthConfig>,
}

impl<B> RefreshSessionUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<AuthConfig>) -> Self {
        Self { backend, config }
    }

    /// Resolve `stored`, the raw (already de-chunked) cookie value.
    pub async fn execute(&self, stored: Option<&str>) -> RefreshOutput {
        self.execute_at(stored, Utc::now()).await
    }

    pub async fn execute_at(&self, stored: Option<&str>, now: DateTime<Utc>) -> RefreshOutput {
        let Some(raw) = stored else {
            tracing::debug!("No session cookie");
            return RefreshOutput::new(SessionOutcome::Unauthenticated, CookieUpdate::Keep);
        };

        let Some(mut session) = AuthSession::from_cookie_value(raw) else {
            tracing::warn!("Session cookie could not be decoded, clearing");
            return RefreshOutput::new(SessionOutcome::Unauthenticated, CookieUpdate::Clear);
        };

        let mut refreshed = false;
        if session.expires_within(self.config.expiry_margin, now) {
            match self.backend.refresh_session(&session.refresh_token).await {
                Ok(fresh) => {
                    session = fresh.with_expiry_from(now);
                    refreshed = true;
                    tracing::debug!(expires_at = ?session.expires_at, "Session refreshed");
                }
                Err(e) if e.is_rejection() => {
                    tracing::info!("Refresh token rejected, signing out");
                    return RefreshOutput::new(SessionOutcome::Unauthenticated, CookieUpdate::Clear);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Session refresh failed");
                    return RefreshOutput::new(SessionOutcome::UpstreamError(e), CookieUpdate::Keep);
                }
            }
        }

        // A used refresh token is spent, so a refreshed pair is written even
        // when the user lookup below fails.
        let cookie_if_refreshed = |session: &AuthSession| {
            if refreshed {
                CookieUpdate::Write(session.clone())
            } else {
                CookieUpdate::Keep
            }
        };

        match self.backend.get_user(&session.access_token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, refreshed, "Session verified");
                if refreshed {
                    session = session.with_user(user.clone());
                }
                let cookie = cookie_if_refreshed(&session);
                RefreshOutput::new(SessionOutcome::Authenticated { user, session }, cookie)
            }
            Err(e) if e.is_rejection() => {
                tracing::info!("Access token rejected, signing out");
                RefreshOutput::new(SessionOutcome::Unauthenticated, CookieUpdate::Clear)
            }
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed");
                let cookie = cookie_if_refreshed(&session);
                RefreshOutput::new(SessionOutcome::UpstreamError(e), cookie)
            }
        }
    }
}
