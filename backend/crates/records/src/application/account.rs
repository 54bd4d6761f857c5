//! Account Queries
//!
//! Read side of the account area: the caller's children and stories, and
//! the options the story form offers.

use kernel::id::{ChildId, StoryId};
use kernel::principal::Principal;
use std::sync::Arc;

use crate::domain::entity::{child::Child, story::Story};
use crate::domain::repository::{ChildRepository, StoryRepository, StoryStructureRepository};
use crate::domain::value_object::{reading_time::ReadingTime, story_structure::StoryStructure};
use crate::error::RecordResult;

/// Everything shown on the account page
#[derive(Debug, Clone)]
pub struct AccountOverview {
    pub children: Vec<Child>,
    pub stories: Vec<Story>,
}

/// Choices offered by the story form
#[derive(Debug, Clone)]
pub struct StoryOptions {
    pub structures: Vec<StoryStructure>,
    pub reading_times: Vec<ReadingTime>,
}

/// Account queries
pub struct AccountQueries<R>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository,
{
    repo: Arc<R>,
}

impl<R> AccountQueries<R>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn overview(&self, owner: &Principal) -> RecordResult<AccountOverview> {
        let children = self.repo.list_children(owner).await?;
        let stories = self.repo.list_stories(owner).await?;

        tracing::debug!(
            user_id = %owner.user_id,
            children = children.len(),
            stories = stories.len(),
            "Account overview loaded"
        );

        Ok(AccountOverview { children, stories })
    }

    pub async fn children(&self, owner: &Principal) -> RecordResult<Vec<Child>> {
        self.repo.list_children(owner).await
    }

    pub async fn child(&self, owner: &Principal, id: ChildId) -> RecordResult<Option<Child>> {
        self.repo.find_child(owner, id).await
    }

    pub async fn stories(&self, owner: &Principal) -> RecordResult<Vec<Story>> {
        self.repo.list_stories(owner).await
    }

    pub async fn story(&self, owner: &Principal, id: StoryId) -> RecordResult<Option<Story>> {
        self.repo.find_story(owner, id).await
    }

    pub async fn story_options(&self, caller: &Principal) -> RecordResult<StoryOptions> {
        let structures = self.repo.list_structures(caller).await?;
        Ok(StoryOptions {
            structures,
            reading_times: ReadingTime::ALL.to_vec(),
        })
    }
}
