//! Sign In Use Case
//!
//! Exchanges email and password for a session at the auth backend.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::backend::AuthBackend;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    /// Session to store in the cookie
    pub session: AuthSession,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<B>
where
    B: AuthBackend,
{
    backend: Arc<B>,
}

impl<B> SignInUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = input.email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingField("Email"));
        }
        if input.password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }

        let session = self
            .backend
            .sign_in_with_password(email, &input.password)
            .await?
            .with_expiry_from(Utc::now());

        // The password grant normally embeds the user; look it up otherwise.
        let user = match session.user.clone() {
            Some(user) => user,
            None => self.backend.get_user(&session.access_token).await?,
        };

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInOutput {
            session: session.with_user(user.clone()),
            user,
        })
    }
}
