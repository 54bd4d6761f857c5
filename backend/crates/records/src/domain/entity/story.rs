//! Story Entity
//!
//! A story request a parent saved: what to write about and how long it runs.

use chrono::{DateTime, Utc};
use kernel::id::{StoryId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{reading_time::ReadingTime, story_structure::StoryStructure};

/// Story row as stored by the row API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    /// Owning parent account
    pub user_id: UserId,
    pub title: String,
    pub prompt: String,
    pub theme: String,
    pub reading_time_minutes: ReadingTime,
    pub story_structure: StoryStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Story {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Validated story fields, ready to insert or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryDraft {
    pub title: String,
    pub prompt: String,
    pub theme: String,
    pub reading_time_minutes: ReadingTime,
    pub story_structure: StoryStructure,
}
