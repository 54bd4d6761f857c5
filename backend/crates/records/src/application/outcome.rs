//! Form submission outcome

use crate::domain::value_object::field_errors::FieldErrors;

/// Result of submitting a record form
///
/// `T` is the saved record, `F` the submitted form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<T, F> {
    /// Written; show `toast` and navigate to `redirect_to`
    Saved {
        record: T,
        created: bool,
        toast: &'static str,
        redirect_to: String,
    },
    /// Validation failed; nothing was sent to the backend
    Rejected { field_errors: FieldErrors },
    /// The backend write failed; stay on the form with the values intact
    Failed { toast: &'static str, values: F },
    /// Update matched no row owned by the caller
    NotFound { redirect_to: String },
}

impl<T, F> FormOutcome<T, F> {
    pub fn is_saved(&self) -> bool {
        matches!(self, FormOutcome::Saved { .. })
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            FormOutcome::Saved { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Toast texts for one record kind
#[derive(Debug, Clone, Copy)]
pub struct Toasts {
    pub created: &'static str,
    pub updated: &'static str,
    pub failed: &'static str,
}

pub const CHILD_TOASTS: Toasts = Toasts {
    created: "Child created successfully",
    updated: "Child updated successfully",
    failed: "Something went wrong",
};

pub const STORY_TOASTS: Toasts = Toasts {
    created: "Story created successfully",
    updated: "Story updated successfully",
    failed: "Failed to save story",
};
