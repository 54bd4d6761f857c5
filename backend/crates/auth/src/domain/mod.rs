//! Domain Layer
//!
//! Contains entities, value objects, and the auth backend trait.

pub mod backend;
pub mod entity;
pub mod value_object;

// Re-exports
pub use backend::AuthBackend;
pub use entity::{auth_session::AuthSession, user::User};
pub use value_object::route_policy::{RouteClass, RoutePolicy};
