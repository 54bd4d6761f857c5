//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the session gateway middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{CurrentUser, RequestContext, session_gateway};
pub use router::auth_routes;
