//! CMS (Blog) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Post entity, frontmatter parsing, reader trait
//! - `application/` - Configuration and blog queries
//! - `infra/` - Filesystem reader for the Keystatic content layout
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Content Layout
//! - `<content_dir>/<slug>.mdoc` or `<content_dir>/<slug>/index.mdoc`
//! - YAML frontmatter between `---` fences (`title`, optional `featuredImage`),
//!   Markdoc body afterwards
//! - Entries that fail to parse are skipped when listing
//!
//! The read API is mounted twice: under `/blog` for the site and under the
//! reserved CMS prefix for editor tooling.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::CmsConfig;
pub use error::{CmsError, CmsResult};
pub use infra::fs::FsPostReader;
pub use presentation::router::cms_router;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::post::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
