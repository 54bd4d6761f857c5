//! Application Layer
//!
//! Use cases and application services.

pub mod account;
pub mod config;
pub mod outcome;
pub mod save_child;
pub mod save_story;

// Re-exports
pub use account::{AccountOverview, AccountQueries, StoryOptions};
pub use config::RecordsConfig;
pub use outcome::{CHILD_TOASTS, FormOutcome, STORY_TOASTS, Toasts};
pub use save_child::{ChildOutcome, SaveChildUseCase};
pub use save_story::{SaveStoryUseCase, StoryOutcome};
