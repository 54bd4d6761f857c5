//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, route policy, auth backend trait
//! - `application/` - Use cases and gateway decisions
//! - `infra/` - Hosted auth service client
//! - `presentation/` - HTTP handlers, DTOs, router, session gateway
//!
//! ## Features
//! - Session gateway in front of every route: CMS bypass, session refresh,
//!   route guard
//! - Sessions issued by the hosted auth service, stored client-side in a
//!   (possibly chunked) cookie and refreshed shortly before expiry
//! - Email + password sign-in and sign-out
//!
//! ## Security Model
//! - Every request re-verifies the access token with the auth service
//! - Record handlers receive a `kernel::principal::Principal` and never read
//!   cookies themselves
//! - Auth service outages either sign the caller out or answer 503,
//!   depending on `AuthFailurePolicy`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, AuthFailurePolicy};
pub use error::{AuthError, AuthResult};
pub use infra::gotrue::GoTrueBackend;
pub use presentation::router::auth_routes;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
