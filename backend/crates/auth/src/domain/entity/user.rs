//! User Entity
//!
//! Identity returned by the hosted auth backend for a valid access token.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

/// Authenticated user
///
/// Only the fields this app reads; the backend sends many more and they are
/// ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: UserId, email: Option<String>) -> Self {
        Self {
            id,
            email,
            role: Some("authenticated".to_string()),
            created_at: None,
        }
    }
}
