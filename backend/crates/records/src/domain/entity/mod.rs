//! Entities

pub mod child;
pub mod story;

pub use child::{Child, ChildDraft};
pub use story::{Story, StoryDraft};
