//! Auth Backend Trait
//!
//! Interface to the hosted auth service. Implementation is in infrastructure layer.

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::error::AuthResult;

/// Hosted auth service
///
/// Token-bearing calls return [`AuthError::SessionInvalid`] when the backend
/// refuses the token and [`AuthError::Upstream`] when it cannot answer.
///
/// [`AuthError::SessionInvalid`]: crate::error::AuthError::SessionInvalid
/// [`AuthError::Upstream`]: crate::error::AuthError::Upstream
#[trait_variant::make(AuthBackend: Send)]
pub trait LocalAuthBackend {
    /// Exchange a refresh token for a new session
    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession>;

    /// Resolve the user an access token belongs to
    async fn get_user(&self, access_token: &str) -> AuthResult<User>;

    /// Password grant
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<AuthSession>;

    /// Revoke the session behind an access token
    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;
}
