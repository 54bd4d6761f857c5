//! Save Child Use Case
//!
//! Validates a child form, then creates or updates exactly one row.

use kernel::id::ChildId;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::config::RecordsConfig;
use crate::application::outcome::{CHILD_TOASTS, FormOutcome};
use crate::domain::entity::child::Child;
use crate::domain::form::ChildForm;
use crate::domain::repository::ChildRepository;

pub type ChildOutcome = FormOutcome<Child, ChildForm>;

/// Save child use case
pub struct SaveChildUseCase<R>
where
    R: ChildRepository,
{
    repo: Arc<R>,
    config: Arc<RecordsConfig>,
}

impl<R> SaveChildUseCase<R>
where
    R: ChildRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<RecordsConfig>) -> Self {
        Self { repo, config }
    }

    /// Insert when `id` is `None`, otherwise update the caller's row `id`.
    pub async fn execute(&self, owner: &Principal, id: Option<ChildId>, form: ChildForm) -> ChildOutcome {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(field_errors) => {
                tracing::debug!(fields = ?field_errors.fields().collect::<Vec<_>>(), "Child form rejected");
                return FormOutcome::Rejected { field_errors };
            }
        };

        let result = match id {
            None => self
                .repo
                .insert_child(owner, &draft)
                .await
                .map(|child| Some((child, true))),
            Some(id) => self
                .repo
                .update_child(owner, id, &draft)
                .await
                .map(|child| child.map(|c| (c, false))),
        };

        match result {
            Ok(Some((record, created))) => {
                tracing::info!(user_id = %owner.user_id, child_id = %record.id, created, "Child saved");
                FormOutcome::Saved {
                    record,
                    created,
                    toast: if created { CHILD_TOASTS.created } else { CHILD_TOASTS.updated },
                    redirect_to: self.config.children_redirect.clone(),
                }
            }
            Ok(None) => {
                tracing::info!(user_id = %owner.user_id, child_id = ?id, "Child update matched no owned row");
                FormOutcome::NotFound {
                    redirect_to: self.config.children_redirect.clone(),
                }
            }
            Err(e) => {
                e.log();
                FormOutcome::Failed {
                    toast: CHILD_TOASTS.failed,
                    values: form,
                }
            }
        }
    }
}
