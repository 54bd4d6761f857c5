//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::route_policy::RoutePolicy;

/// What the gateway does when the auth backend cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFailurePolicy {
    /// Continue as if nobody were signed in
    #[default]
    TreatAsSignedOut,
    /// Answer 503 without running the route
    ServiceUnavailable,
}

impl AuthFailurePolicy {
    pub const fn code(&self) -> &'static str {
        match self {
            AuthFailurePolicy::TreatAsSignedOut => "signed-out",
            AuthFailurePolicy::ServiceUnavailable => "unavailable",
        }
    }
}

impl fmt::Display for AuthFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AuthFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed-out" | "signed_out" | "open" => Ok(AuthFailurePolicy::TreatAsSignedOut),
            "unavailable" | "closed" => Ok(AuthFailurePolicy::ServiceUnavailable),
            other => Err(format!("unknown auth failure policy: {}", other)),
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie attributes; the name is `sb-<project-ref>-auth-token`
    pub session_cookie: CookieConfig,
    /// Refresh when the access token expires within this window
    pub expiry_margin: Duration,
    pub failure_policy: AuthFailurePolicy,
    pub routes: RoutePolicy,
}

/// Cookie lifetime used by the hosted backend's own helpers (400 days)
const SESSION_COOKIE_MAX_AGE_SECS: i64 = 400 * 24 * 3600;

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: CookieConfig {
                name: "sb-auth-token".to_string(),
                secure: true,
                http_only: true,
                same_site: SameSite::Lax,
                path: "/".to_string(),
                max_age_secs: Some(SESSION_COOKIE_MAX_AGE_SECS),
            },
            expiry_margin: Duration::from_secs(90),
            failure_policy: AuthFailurePolicy::default(),
            routes: RoutePolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Config for a backend project; sets the session cookie name.
    pub fn for_project(project_ref: &str) -> Self {
        let mut config = Self::default();
        config.session_cookie.name = session_cookie_name(project_ref);
        config
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        let mut config = Self::default();
        config.session_cookie.secure = false;
        config
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie.name
    }
}

/// `sb-<project-ref>-auth-token`
pub fn session_cookie_name(project_ref: &str) -> String {
    if project_ref.is_empty() {
        "sb-auth-token".to_string()
    } else {
        format!("sb-{}-auth-token", project_ref)
    }
}
