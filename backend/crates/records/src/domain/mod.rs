//! Domain Layer
//!
//! Contains entities, value objects, forms, and repository traits.

pub mod entity;
pub mod form;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Child, ChildDraft, Story, StoryDraft};
pub use form::{ChildForm, StoryForm};
pub use repository::{ChildRepository, StoryRepository, StoryStructureRepository};
pub use value_object::{FieldErrors, ReadingTime, StoryStructure};
