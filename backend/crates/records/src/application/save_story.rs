//! Save Story Use Case
//!
//! Validates a story form, then creates or updates exactly one row.

use kernel::id::StoryId;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::config::RecordsConfig;
use crate::application::outcome::{FormOutcome, STORY_TOASTS};
use crate::domain::entity::story::Story;
use crate::domain::form::StoryForm;
use crate::domain::repository::StoryRepository;

pub type StoryOutcome = FormOutcome<Story, StoryForm>;

/// Save story use case
pub struct SaveStoryUseCase<R>
where
    R: StoryRepository,
{
    repo: Arc<R>,
    config: Arc<RecordsConfig>,
}

impl<R> SaveStoryUseCase<R>
where
    R: StoryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<RecordsConfig>) -> Self {
        Self { repo, config }
    }

    /// Insert when `id` is `None`, otherwise update the caller's row `id`.
    pub async fn execute(&self, owner: &Principal, id: Option<StoryId>, form: StoryForm) -> StoryOutcome {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(field_errors) => {
                tracing::debug!(fields = ?field_errors.fields().collect::<Vec<_>>(), "Story form rejected");
                return FormOutcome::Rejected { field_errors };
            }
        };

        let result = match id {
            None => self
                .repo
                .insert_story(owner, &draft)
                .await
                .map(|story| Some((story, true))),
            Some(id) => self
                .repo
                .update_story(owner, id, &draft)
                .await
                .map(|story| story.map(|c| (c, false))),
        };

        match result {
            Ok(Some((record, created))) => {
                tracing::info!(user_id = %owner.user_id, story_id = %record.id, created, "Story saved");
                FormOutcome::Saved {
                    record,
                    created,
                    toast: if created { STORY_TOASTS.created } else { STORY_TOASTS.updated },
                    redirect_to: self.config.stories_redirect.clone(),
                }
            }
            Ok(None) => {
                tracing::info!(user_id = %owner.user_id, story_id = ?id, "Story update matched no owned row");
                FormOutcome::NotFound {
                    redirect_to: self.config.stories_redirect.clone(),
                }
            }
            Err(e) => {
                e.log();
                FormOutcome::Failed {
                    toast: STORY_TOASTS.failed,
                    values: form,
                }
            }
        }
    }
}
