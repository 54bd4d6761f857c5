//! Sign Out Use Case
//!
//! Revokes the session at the auth backend. Cookie removal is the caller's job
//! and happens whatever this returns.

use std::sync::Arc;

use crate::domain::backend::AuthBackend;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<B>
where
    B: AuthBackend,
{
    backend: Arc<B>,
}

impl<B> SignOutUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, access_token: &str) -> AuthResult<()> {
        self.backend.sign_out(access_token).await?;
        tracing::info!("User signed out");
        Ok(())
    }
}
