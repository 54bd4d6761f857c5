use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Narrative structure of a story
///
/// The allowed values live in a backend enum and are listed at runtime,
/// so this is an open newtype rather than a Rust enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(transparent)]
pub struct StoryStructure(String);

impl StoryStructure {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display label: the first underscore becomes a space (`hero_journey` → `hero journey`).
    pub fn label(&self) -> String {
        self.0.replacen('_', " ", 1)
    }
}

impl AsRef<str> for StoryStructure {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
