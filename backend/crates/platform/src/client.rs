//! Upstream HTTP client
//!
//! Thin wrapper over `reqwest` for the hosted auth/database backend. Every
//! request carries the public API key; calls made on behalf of a user also
//! carry that user's access token as a bearer credential.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Upstream connection settings
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub base_url: String,
    /// Public (anon) API key
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Project ref used in cookie names: the first label of the host.
    ///
    /// `https://abcd.supabase.co` → `abcd`, `http://127.0.0.1:54321` → `127`.
    pub fn project_ref(&self) -> String {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.base_url);
        let host = without_scheme.split(['/', ':']).next().unwrap_or_default();
        host.split('.').next().unwrap_or_default().to_string()
    }
}

/// Error talking to the upstream backend
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Connection, TLS, timeout, or body transfer failure
    #[error("Upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Upstream returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Success status but an unexpected body
    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),

    /// Client could not be constructed
    #[error("Upstream client configuration error: {0}")]
    Config(String),
}

impl UpstreamError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The backend understood the request and refused it (4xx).
    pub fn is_rejection(&self) -> bool {
        self.status().is_some_and(|s| s.is_client_error())
    }

    /// The backend could not be reached or failed on its side.
    pub fn is_unavailable(&self) -> bool {
        match self {
            UpstreamError::Transport(_) => true,
            UpstreamError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match &err {
            UpstreamError::Transport(e) if e.is_timeout() => {
                AppError::new(ErrorKind::GatewayTimeout, "Backend request timed out")
            }
            UpstreamError::Transport(_) => AppError::service_unavailable("Backend unreachable"),
            UpstreamError::Status { status, .. } => match status.as_u16() {
                401 => AppError::unauthorized("Unauthorized"),
                404 => AppError::not_found("Not found"),
                s if s >= 500 => AppError::bad_gateway("Backend error"),
                _ => AppError::bad_request("Backend rejected the request"),
            },
            UpstreamError::Decode(_) => AppError::bad_gateway("Backend returned an unreadable response"),
            UpstreamError::Config(_) => AppError::internal("Backend client misconfigured"),
        }
        .with_source(err)
    }
}

/// Shared HTTP client for the hosted backend
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    api_key: Arc<str>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        if config.base_url.trim().is_empty() {
            return Err(UpstreamError::Config("base URL is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            api_key: Arc::from(config.api_key.as_str()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path (`/auth/v1/user`, `/rest/v1/children`, ...)
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request authenticated with the API key only.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", self.api_key.as_ref())
    }

    /// Request made on behalf of a signed-in user.
    pub fn request_as(&self, method: Method, path: &str, access_token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(access_token)
    }

    /// Send and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let response = Self::check_status(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// Send and discard the body.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<(), UpstreamError> {
        Self::check_status(builder.send().await?).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);

        tracing::debug!(status = %status, message = %message, "Upstream request failed");

        Err(UpstreamError::Status { status, message })
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// The auth API uses `msg` / `error_description`, the row API `message`.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.chars().take(200).collect()
}
