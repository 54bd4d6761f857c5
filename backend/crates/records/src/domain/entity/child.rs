//! Child Entity
//!
//! A child profile owned by one parent account.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ChildId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::birthdate;

/// Child row as stored by the row API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    /// Owning parent account
    pub user_id: UserId,
    pub name: String,
    #[serde(with = "birthdate")]
    pub birthdate: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Child {
    /// Age in whole years on `today`
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        birthdate::age_on(self.birthdate, today)
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Validated child fields, ready to insert or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildDraft {
    pub name: String,
    #[serde(with = "birthdate")]
    pub birthdate: NaiveDate,
}
