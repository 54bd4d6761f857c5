//! Domain Layer

pub mod post;
pub mod reader;

pub use post::{Post, PostSummary};
pub use reader::{LocalPostReader, PostReader};
