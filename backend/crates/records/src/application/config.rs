//! Application Configuration
//!
//! Configuration for the Records application layer.

/// Records application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsConfig {
    /// Where the browser goes after a child is saved or not found
    pub children_redirect: String,
    /// Where the browser goes after a story is saved or not found
    pub stories_redirect: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            children_redirect: "/account#children".to_string(),
            stories_redirect: "/account#stories".to_string(),
        }
    }
}

impl RecordsConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }
}
