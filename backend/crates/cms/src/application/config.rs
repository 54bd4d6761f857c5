//! Application Configuration
//!
//! Configuration for the CMS application layer.

use std::path::PathBuf;

/// CMS application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsConfig {
    /// Directory holding the posts collection
    pub content_dir: PathBuf,
    /// Reserved prefix the editor-facing read API is mounted under; `None`
    /// leaves it unmounted
    pub api_prefix: Option<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content/posts"),
            api_prefix: Some("/api/keystatic".to_string()),
        }
    }
}

impl CmsConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }

    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    /// Path of the editor-facing post listing
    pub fn posts_api_path(&self) -> Option<String> {
        self.api_prefix
            .as_deref()
            .map(|prefix| format!("{}/posts", prefix.trim_end_matches('/')))
    }
}
