//! In-memory Repository Implementation
//!
//! Same owner scoping as the row API; used by tests and local runs without
//! a backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use kernel::id::{ChildId, StoryId};
use kernel::principal::Principal;
use tokio::sync::RwLock;

use crate::domain::entity::{
    child::{Child, ChildDraft},
    story::{Story, StoryDraft},
};
use crate::domain::repository::{ChildRepository, StoryRepository, StoryStructureRepository};
use crate::domain::value_object::story_structure::StoryStructure;
use crate::error::{RecordError, RecordResult};

/// In-memory record store
///
/// Clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemoryRecords {
    children: Arc<RwLock<Vec<Child>>>,
    stories: Arc<RwLock<Vec<Story>>>,
    structures: Arc<Vec<StoryStructure>>,
    fail_writes: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structures<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.structures = Arc::new(values.into_iter().map(StoryStructure::new).collect());
        self
    }

    /// Make every insert and update fail as if the backend were down.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of repository calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_write(&self) -> RecordResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RecordError::Internal("write rejected by store".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Child Repository Implementation
// ============================================================================

impl ChildRepository for InMemoryRecords {
    async fn list_children(&self, owner: &Principal) -> RecordResult<Vec<Child>> {
        self.record_call();
        let rows = self.children.read().await;
        Ok(rows
            .iter()
            .filter(|c| c.is_owned_by(owner.user_id))
            .cloned()
            .collect())
    }

    async fn find_child(&self, owner: &Principal, id: ChildId) -> RecordResult<Option<Child>> {
        self.record_call();
        let rows = self.children.read().await;
        Ok(rows
            .iter()
            .find(|c| c.id == id && c.is_owned_by(owner.user_id))
            .cloned())
    }

    async fn insert_child(&self, owner: &Principal, draft: &ChildDraft) -> RecordResult<Child> {
        self.record_call();
        self.check_write()?;

        let child = Child {
            id: ChildId::new(),
            user_id: owner.user_id,
            name: draft.name.clone(),
            birthdate: draft.birthdate,
            created_at: Some(Utc::now()),
        };
        self.children.write().await.push(child.clone());
        Ok(child)
    }

    async fn update_child(
        &self,
        owner: &Principal,
        id: ChildId,
        draft: &ChildDraft,
    ) -> RecordResult<Option<Child>> {
        self.record_call();
        self.check_write()?;

        let mut rows = self.children.write().await;
        Ok(rows
            .iter_mut()
            .find(|c| c.id == id && c.is_owned_by(owner.user_id))
            .map(|child| {
                child.name = draft.name.clone();
                child.birthdate = draft.birthdate;
                child.clone()
            }))
    }
}

// ============================================================================
// Story Repository Implementation
// ============================================================================

impl StoryRepository for InMemoryRecords {
    async fn list_stories(&self, owner: &Principal) -> RecordResult<Vec<Story>> {
        self.record_call();
        let rows = self.stories.read().await;
        Ok(rows
            .iter()
            .filter(|s| s.is_owned_by(owner.user_id))
            .cloned()
            .collect())
    }

    async fn find_story(&self, owner: &Principal, id: StoryId) -> RecordResult<Option<Story>> {
        self.record_call();
        let rows = self.stories.read().await;
        Ok(rows
            .iter()
            .find(|s| s.id == id && s.is_owned_by(owner.user_id))
            .cloned())
    }

    async fn insert_story(&self, owner: &Principal, draft: &StoryDraft) -> RecordResult<Story> {
        self.record_call();
        self.check_write()?;

        let story = Story {
            id: StoryId::new(),
            user_id: owner.user_id,
            title: draft.title.clone(),
            prompt: draft.prompt.clone(),
            theme: draft.theme.clone(),
            reading_time_minutes: draft.reading_time_minutes,
            story_structure: draft.story_structure.clone(),
            created_at: Some(Utc::now()),
        };
        self.stories.write().await.push(story.clone());
        Ok(story)
    }

    async fn update_story(
        &self,
        owner: &Principal,
        id: StoryId,
        draft: &StoryDraft,
    ) -> RecordResult<Option<Story>> {
        self.record_call();
        self.check_write()?;

        let mut rows = self.stories.write().await;
        Ok(rows
            .iter_mut()
            .find(|s| s.id == id && s.is_owned_by(owner.user_id))
            .map(|story| {
                story.title = draft.title.clone();
                story.prompt = draft.prompt.clone();
                story.theme = draft.theme.clone();
                story.reading_time_minutes = draft.reading_time_minutes;
                story.story_structure = draft.story_structure.clone();
                story.clone()
            }))
    }
}

impl StoryStructureRepository for InMemoryRecords {
    async fn list_structures(&self, _caller: &Principal) -> RecordResult<Vec<StoryStructure>> {
        self.record_call();
        Ok(self.structures.as_ref().clone())
    }
}
