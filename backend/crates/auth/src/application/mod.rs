//! Application Layer
//!
//! Use cases and application services.

pub mod cms_bypass;
pub mod config;
pub mod refresh_session;
pub mod route_guard;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use cms_bypass::BypassDecision;
pub use config::{AuthConfig, AuthFailurePolicy};
pub use refresh_session::{CookieUpdate, RefreshOutput, RefreshSessionUseCase, SessionOutcome};
pub use route_guard::GuardDecision;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
