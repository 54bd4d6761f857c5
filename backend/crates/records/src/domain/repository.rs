//! Repository Traits
//!
//! Interfaces for record persistence. Implementation is in infrastructure layer.
//!
//! Every method takes the caller's [`Principal`]: reads are filtered by its
//! user id and writes are tagged with it (insert) or scoped by it (update).
//! No method addresses a row by id alone.

use kernel::id::{ChildId, StoryId};
use kernel::principal::Principal;

use crate::domain::entity::{
    child::{Child, ChildDraft},
    story::{Story, StoryDraft},
};
use crate::domain::value_object::story_structure::StoryStructure;
use crate::error::RecordResult;

/// Child repository trait
#[trait_variant::make(ChildRepository: Send)]
pub trait LocalChildRepository {
    /// Children owned by the caller
    async fn list_children(&self, owner: &Principal) -> RecordResult<Vec<Child>>;

    /// Find a child owned by the caller
    async fn find_child(&self, owner: &Principal, id: ChildId) -> RecordResult<Option<Child>>;

    /// Insert a child tagged with the caller's user id
    async fn insert_child(&self, owner: &Principal, draft: &ChildDraft) -> RecordResult<Child>;

    /// Update a child by id and owner; `None` when no row matched
    async fn update_child(
        &self,
        owner: &Principal,
        id: ChildId,
        draft: &ChildDraft,
    ) -> RecordResult<Option<Child>>;
}

/// Story repository trait
#[trait_variant::make(StoryRepository: Send)]
pub trait LocalStoryRepository {
    /// Stories owned by the caller
    async fn list_stories(&self, owner: &Principal) -> RecordResult<Vec<Story>>;

    /// Find a story owned by the caller
    async fn find_story(&self, owner: &Principal, id: StoryId) -> RecordResult<Option<Story>>;

    /// Insert a story tagged with the caller's user id
    async fn insert_story(&self, owner: &Principal, draft: &StoryDraft) -> RecordResult<Story>;

    /// Update a story by id and owner; `None` when no row matched
    async fn update_story(
        &self,
        owner: &Principal,
        id: StoryId,
        draft: &StoryDraft,
    ) -> RecordResult<Option<Story>>;
}

/// Story structure catalogue
#[trait_variant::make(StoryStructureRepository: Send)]
pub trait LocalStoryStructureRepository {
    /// Structures the backend accepts, in backend order
    async fn list_structures(&self, caller: &Principal) -> RecordResult<Vec<StoryStructure>>;
}
