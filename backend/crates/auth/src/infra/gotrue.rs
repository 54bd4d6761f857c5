//! Hosted Auth Service Implementation
//!
//! Speaks the auth REST API under `/auth/v1` through the shared upstream client.

use axum::http::Method;
use platform::client::UpstreamClient;
use serde_json::json;

use crate::domain::backend::AuthBackend;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::error::{AuthError, AuthResult};

const TOKEN_REFRESH_PATH: &str = "/auth/v1/token?grant_type=refresh_token";
const TOKEN_PASSWORD_PATH: &str = "/auth/v1/token?grant_type=password";
const USER_PATH: &str = "/auth/v1/user";
const LOGOUT_PATH: &str = "/auth/v1/logout?scope=local";

/// Auth backend over HTTP
#[derive(Clone)]
pub struct GoTrueBackend {
    client: UpstreamClient,
}

impl GoTrueBackend {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

// ============================================================================
// Auth Backend Implementation
// ============================================================================

impl AuthBackend for GoTrueBackend {
    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        let request = self
            .client
            .request(Method::POST, TOKEN_REFRESH_PATH)
            .json(&json!({ "refresh_token": refresh_token }));

        self.client
            .send_json(request)
            .await
            .map_err(AuthError::from_token_call)
    }

    async fn get_user(&self, access_token: &str) -> AuthResult<User> {
        let request = self.client.request_as(Method::GET, USER_PATH, access_token);

        self.client
            .send_json(request)
            .await
            .map_err(AuthError::from_token_call)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let request = self
            .client
            .request(Method::POST, TOKEN_PASSWORD_PATH)
            .json(&json!({ "email": email, "password": password }));

        self.client.send_json(request).await.map_err(|e| {
            if e.is_rejection() {
                AuthError::InvalidCredentials
            } else {
                AuthError::Upstream(e)
            }
        })
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self
            .client
            .request_as(Method::POST, LOGOUT_PATH, access_token);

        self.client
            .send_empty(request)
            .await
            .map_err(AuthError::from_token_call)
    }
}
