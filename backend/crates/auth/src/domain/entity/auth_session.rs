//! Auth Session Entity
//!
//! Token pair issued by the hosted auth backend, persisted client-side in the
//! session cookie as `base64-` followed by the base64url-encoded JSON.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::domain::entity::user::User;

const COOKIE_VALUE_PREFIX: &str = "base64-";

/// Auth session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds the access token was valid for when issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Access token expiry (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthSession {
    /// Fill `expires_at` from `expires_in` when the backend only sent the latter.
    pub fn with_expiry_from(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now.timestamp().saturating_add(secs));
        }
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// True when the access token expires within `margin` of `now`.
    ///
    /// A session without a known expiry is treated as expiring.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let margin = i64::try_from(margin.as_secs()).unwrap_or(i64::MAX);
                expires_at.saturating_sub(now.timestamp()) <= margin
            }
            None => true,
        }
    }

    /// Encode for the session cookie
    pub fn to_cookie_value(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("{}{}", COOKIE_VALUE_PREFIX, URL_SAFE_NO_PAD.encode(json)))
    }

    /// Decode a session cookie value.
    ///
    /// Accepts the `base64-` form and bare JSON. Anything else is `None`.
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let json = match value.strip_prefix(COOKIE_VALUE_PREFIX) {
            Some(encoded) => URL_SAFE_NO_PAD
                .decode(encoded.trim_end_matches('='))
                .ok()?,
            None => value.as_bytes().to_vec(),
        };

        let session: AuthSession = serde_json::from_slice(&json).ok()?;
        if session.access_token.is_empty() || session.refresh_token.is_empty() {
            return None;
        }
        Some(session)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.as_ref().map(|u| u.id))
            .finish()
    }
}
