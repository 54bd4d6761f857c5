//! Value Objects

pub mod birthdate;
pub mod field_errors;
pub mod reading_time;
pub mod story_structure;

pub use field_errors::FieldErrors;
pub use reading_time::ReadingTime;
pub use story_structure::StoryStructure;
