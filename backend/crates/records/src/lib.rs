//! Records (Child and Story) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, forms, repository traits
//! - `application/` - Use cases and account queries
//! - `infra/` - Row API client and in-memory store
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Child profiles (name, birthdate, derived age)
//! - Story requests (title, prompt, theme, reading time, narrative structure)
//! - Form validation with per-field messages before any backend call
//! - Account views listing the caller's records
//!
//! ## Ownership Model
//! - Handlers require a `kernel::principal::Principal` (401 otherwise)
//! - Inserts are tagged with the caller's user id
//! - Reads and updates filter by id *and* user id; a foreign row looks
//!   exactly like a missing one

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::RecordsConfig;
pub use error::{RecordError, RecordResult};
pub use infra::{memory::InMemoryRecords, postgrest::PostgrestRecords};
pub use presentation::router::records_router;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::form::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
