//! Record Forms
//!
//! Submitted field sets and their validation. Validation happens before any
//! backend call; a form that fails it never leaves this process.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::entity::{child::ChildDraft, story::StoryDraft};
use crate::domain::value_object::{
    birthdate, field_errors::FieldErrors, reading_time::ReadingTime,
    story_structure::StoryStructure,
};

pub const NAME_REQUIRED: &str = "Name is required";
pub const BIRTHDATE_REQUIRED: &str = "Birthdate is required";
pub const BIRTHDATE_INVALID: &str = "Birthdate must be a date (YYYY-MM-DD)";
pub const TITLE_REQUIRED: &str = "Title is required";
pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const THEME_REQUIRED: &str = "Theme is required";
pub const READING_TIME_REQUIRED: &str = "Reading time is required";
pub const READING_TIME_INVALID: &str = "Reading time must be one of 5, 10, 15, 20, 20+";
pub const STORY_STRUCTURE_REQUIRED: &str = "Story structure is required";

/// Form field as text: `null` and non-scalar values read as empty, numbers
/// and booleans as their JSON text.
fn field_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Trimmed value, or `None` when blank
fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ============================================================================
// Child
// ============================================================================

/// Child form as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildForm {
    #[serde(default, deserialize_with = "field_text")]
    pub name: String,
    #[serde(default, deserialize_with = "field_text")]
    pub birthdate: String,
}

impl ChildForm {
    pub fn validate(&self) -> Result<ChildDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&self.name);
        if name.is_none() {
            errors.add("name", NAME_REQUIRED);
        }

        let birthdate = match required(&self.birthdate) {
            None => {
                errors.add("birthdate", BIRTHDATE_REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = birthdate::parse(raw);
                if parsed.is_none() {
                    errors.add("birthdate", BIRTHDATE_INVALID);
                }
                parsed
            }
        };

        match (name, birthdate) {
            (Some(name), Some(birthdate)) if errors.is_empty() => Ok(ChildDraft {
                name: name.to_string(),
                birthdate,
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Story
// ============================================================================

/// Story form as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryForm {
    #[serde(default, deserialize_with = "field_text")]
    pub title: String,
    #[serde(default, deserialize_with = "field_text")]
    pub prompt: String,
    #[serde(default, deserialize_with = "field_text")]
    pub theme: String,
    #[serde(default, deserialize_with = "field_text")]
    pub reading_time_minutes: String,
    #[serde(default, deserialize_with = "field_text")]
    pub story_structure: String,
}

impl StoryForm {
    pub fn validate(&self) -> Result<StoryDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required(&self.title);
        if title.is_none() {
            errors.add("title", TITLE_REQUIRED);
        }
        let prompt = required(&self.prompt);
        if prompt.is_none() {
            errors.add("prompt", PROMPT_REQUIRED);
        }
        let theme = required(&self.theme);
        if theme.is_none() {
            errors.add("theme", THEME_REQUIRED);
        }

        let reading_time = match required(&self.reading_time_minutes) {
            None => {
                errors.add("reading_time_minutes", READING_TIME_REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = raw.parse::<ReadingTime>().ok();
                if parsed.is_none() {
                    errors.add("reading_time_minutes", READING_TIME_INVALID);
                }
                parsed
            }
        };

        let structure = required(&self.story_structure);
        if structure.is_none() {
            errors.add("story_structure", STORY_STRUCTURE_REQUIRED);
        }

        match (title, prompt, theme, reading_time, structure) {
            (Some(title), Some(prompt), Some(theme), Some(reading_time), Some(structure))
                if errors.is_empty() =>
            {
                Ok(StoryDraft {
                    title: title.to_string(),
                    prompt: prompt.to_string(),
                    theme: theme.to_string(),
                    reading_time_minutes: reading_time,
                    story_structure: StoryStructure::new(structure),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn story_form() -> StoryForm {
        StoryForm {
            title: "The Moon Boat".to_string(),
            prompt: "A boat that sails to the moon".to_string(),
            theme: "adventure".to_string(),
            reading_time_minutes: "10".to_string(),
            story_structure: "voyage_and_return".to_string(),
        }
    }

    #[test]
    fn test_child_empty_name() {
        let form = ChildForm {
            name: String::new(),
            birthdate: "2020-01-01".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_child_blank_fields() {
        let form = ChildForm {
            name: "   ".to_string(),
            birthdate: "\t".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some(NAME_REQUIRED));
        assert_eq!(errors.get("birthdate"), Some(BIRTHDATE_REQUIRED));
    }

    #[test]
    fn test_child_valid_trims_and_cuts_time() {
        let form = ChildForm {
            name: " Ada ".to_string(),
            birthdate: "2020-01-01T00:00:00.000Z".to_string(),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.birthdate, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_child_invalid_birthdate() {
        let form = ChildForm {
            name: "Ada".to_string(),
            birthdate: "yesterday".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("birthdate"), Some(BIRTHDATE_INVALID));
    }

    #[test]
    fn test_non_string_fields_reach_validation() {
        let form: ChildForm =
            serde_json::from_str(r#"{"name":null,"birthdate":"2020-01-01"}"#).unwrap();
        assert_eq!(form.validate().unwrap_err().get("name"), Some(NAME_REQUIRED));

        let form: StoryForm = serde_json::from_str(
            r#"{"title":"T","prompt":"P","theme":["x"],"reading_time_minutes":10,"story_structure":"quest"}"#,
        )
        .unwrap();
        assert_eq!(form.reading_time_minutes, "10");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["theme"]);
    }

    #[test]
    fn test_story_all_missing() {
        let errors = StoryForm::default().validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("prompt"), Some("Prompt is required"));
        assert_eq!(errors.get("theme"), Some("Theme is required"));
        assert_eq!(
            errors.get("reading_time_minutes"),
            Some("Reading time is required")
        );
        assert_eq!(
            errors.get("story_structure"),
            Some("Story structure is required")
        );
    }

    #[test]
    fn test_story_valid() {
        let draft = story_form().validate().unwrap();
        assert_eq!(draft.reading_time_minutes, ReadingTime::Ten);
        assert_eq!(draft.story_structure.as_str(), "voyage_and_return");
    }

    #[test]
    fn test_story_unknown_reading_time() {
        let form = StoryForm {
            reading_time_minutes: "45".to_string(),
            ..story_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["reading_time_minutes"]);
    }
}
