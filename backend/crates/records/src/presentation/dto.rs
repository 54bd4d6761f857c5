//! API DTOs (Data Transfer Objects)

use chrono::NaiveDate;
use kernel::principal::Principal;
use serde::Serialize;

use crate::application::account::StoryOptions;
use crate::domain::entity::{child::Child, story::Story};
use crate::domain::value_object::{
    field_errors::FieldErrors, reading_time::ReadingTime, story_structure::StoryStructure,
};

// ============================================================================
// Records
// ============================================================================

/// Child as shown to the parent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildResponse {
    pub id: String,
    pub name: String,
    /// `YYYY-MM-DD`, ready for a date input
    pub birthdate: String,
    pub age: u32,
}

impl ChildResponse {
    pub fn from_child(child: &Child, today: NaiveDate) -> Self {
        Self {
            id: child.id.to_string(),
            name: child.name.clone(),
            birthdate: child.birthdate.format("%Y-%m-%d").to_string(),
            age: child.age_on(today),
        }
    }
}

/// Story as shown to the parent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub theme: String,
    pub reading_time_minutes: ReadingTime,
    pub reading_time_label: String,
    pub story_structure: StoryStructure,
    pub story_structure_label: String,
}

impl From<&Story> for StoryResponse {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.to_string(),
            title: story.title.clone(),
            prompt: story.prompt.clone(),
            theme: story.theme.clone(),
            reading_time_minutes: story.reading_time_minutes,
            reading_time_label: story.reading_time_minutes.label(),
            story_structure: story.story_structure.clone(),
            story_structure_label: story.story_structure.label(),
        }
    }
}

// ============================================================================
// Account
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUserResponse {
    pub id: String,
    pub email: Option<String>,
}

impl From<&Principal> for AccountUserResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.user_id.to_string(),
            email: principal.email.clone(),
        }
    }
}

/// Account page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub user: AccountUserResponse,
    pub children: Vec<ChildResponse>,
    pub stories: Vec<StoryResponse>,
}

/// One select option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionResponse {
    pub value: String,
    pub label: String,
}

/// Choices for the story form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryOptionsResponse {
    pub structures: Vec<OptionResponse>,
    pub reading_times: Vec<OptionResponse>,
}

impl From<StoryOptions> for StoryOptionsResponse {
    fn from(options: StoryOptions) -> Self {
        Self {
            structures: options
                .structures
                .iter()
                .map(|s| OptionResponse {
                    value: s.to_string(),
                    label: s.label(),
                })
                .collect(),
            reading_times: options
                .reading_times
                .iter()
                .map(|t| OptionResponse {
                    value: t.to_string(),
                    label: t.label(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Form submission
// ============================================================================

/// Saved: show the toast, then navigate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResponse<T: Serialize> {
    pub toast: &'static str,
    pub redirect_to: String,
    pub record: T,
}

/// Validation failed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedResponse {
    pub field_errors: FieldErrors,
}

/// Backend write failed: show the toast, keep the form filled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedResponse<F: Serialize> {
    pub toast: &'static str,
    pub values: F,
}

/// Row not found for the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub redirect_to: String,
}
