//! Row API Repository Implementations
//!
//! Tables `children` and `stories` plus the story structure RPC, reached
//! through the shared upstream client with the caller's access token so the
//! backend's row-level policies apply on top of the explicit owner filters.

use axum::http::Method;
use kernel::id::{ChildId, StoryId, UserId};
use kernel::principal::Principal;
use platform::client::{UpstreamClient, UpstreamError};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    child::{Child, ChildDraft},
    story::{Story, StoryDraft},
};
use crate::domain::repository::{ChildRepository, StoryRepository, StoryStructureRepository};
use crate::domain::value_object::story_structure::StoryStructure;
use crate::error::{RecordError, RecordResult};

const CHILDREN_PATH: &str = "/rest/v1/children";
const STORIES_PATH: &str = "/rest/v1/stories";
const STORY_STRUCTURES_RPC: &str = "/rest/v1/rpc/get_story_structure_enum_values";

/// Row API-backed record repository
#[derive(Clone)]
pub struct PostgrestRecords {
    client: UpstreamClient,
}

impl PostgrestRecords {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    fn select(&self, path: &str, owner: &Principal) -> RequestBuilder {
        self.client
            .request_as(Method::GET, path, &owner.access_token)
            .query(&[("select", "*".to_string()), ("user_id", eq(owner.user_id))])
            .query(&[("order", "created_at.asc")])
    }

    fn select_one(&self, path: &str, owner: &Principal, id: impl std::fmt::Display) -> RequestBuilder {
        self.client
            .request_as(Method::GET, path, &owner.access_token)
            .query(&[
                ("select", "*".to_string()),
                ("id", eq(id)),
                ("user_id", eq(owner.user_id)),
            ])
    }

    fn insert<B: Serialize>(&self, path: &str, owner: &Principal, body: &B) -> RequestBuilder {
        self.client
            .request_as(Method::POST, path, &owner.access_token)
            .header("Prefer", "return=representation")
            .json(body)
    }

    fn update<B: Serialize>(
        &self,
        path: &str,
        owner: &Principal,
        id: impl std::fmt::Display,
        body: &B,
    ) -> RequestBuilder {
        self.client
            .request_as(Method::PATCH, path, &owner.access_token)
            .query(&[("id", eq(id)), ("user_id", eq(owner.user_id))])
            .header("Prefer", "return=representation")
            .json(body)
    }

    async fn rows<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> RecordResult<Vec<T>> {
        Ok(self.client.send_json::<Vec<T>>(request).await?)
    }

    async fn first_row<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> RecordResult<Option<T>> {
        Ok(self.rows(request).await?.into_iter().next())
    }
}

/// PostgREST equality filter value
fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// Insert body: the draft plus the owner
#[derive(Serialize)]
struct OwnedRow<'a, D: Serialize> {
    #[serde(flatten)]
    draft: &'a D,
    user_id: UserId,
}

fn missing_representation() -> RecordError {
    RecordError::Upstream(UpstreamError::Decode(
        "insert returned no row".to_string(),
    ))
}

// ============================================================================
// Child Repository Implementation
// ============================================================================

impl ChildRepository for PostgrestRecords {
    async fn list_children(&self, owner: &Principal) -> RecordResult<Vec<Child>> {
        self.rows(self.select(CHILDREN_PATH, owner)).await
    }

    async fn find_child(&self, owner: &Principal, id: ChildId) -> RecordResult<Option<Child>> {
        self.first_row(self.select_one(CHILDREN_PATH, owner, id)).await
    }

    async fn insert_child(&self, owner: &Principal, draft: &ChildDraft) -> RecordResult<Child> {
        let body = OwnedRow {
            draft,
            user_id: owner.user_id,
        };
        self.first_row(self.insert(CHILDREN_PATH, owner, &body))
            .await?
            .ok_or_else(missing_representation)
    }

    async fn update_child(
        &self,
        owner: &Principal,
        id: ChildId,
        draft: &ChildDraft,
    ) -> RecordResult<Option<Child>> {
        self.first_row(self.update(CHILDREN_PATH, owner, id, draft))
            .await
    }
}

// ============================================================================
// Story Repository Implementation
// ============================================================================

impl StoryRepository for PostgrestRecords {
    async fn list_stories(&self, owner: &Principal) -> RecordResult<Vec<Story>> {
        self.rows(self.select(STORIES_PATH, owner)).await
    }

    async fn find_story(&self, owner: &Principal, id: StoryId) -> RecordResult<Option<Story>> {
        self.first_row(self.select_one(STORIES_PATH, owner, id)).await
    }

    async fn insert_story(&self, owner: &Principal, draft: &StoryDraft) -> RecordResult<Story> {
        let body = OwnedRow {
            draft,
            user_id: owner.user_id,
        };
        self.first_row(self.insert(STORIES_PATH, owner, &body))
            .await?
            .ok_or_else(missing_representation)
    }

    async fn update_story(
        &self,
        owner: &Principal,
        id: StoryId,
        draft: &StoryDraft,
    ) -> RecordResult<Option<Story>> {
        self.first_row(self.update(STORIES_PATH, owner, id, draft))
            .await
    }
}

// ============================================================================
// Story Structure Catalogue
// ============================================================================

#[derive(Deserialize)]
struct StructureRow {
    story_structure_value: StoryStructure,
}

impl StoryStructureRepository for PostgrestRecords {
    async fn list_structures(&self, caller: &Principal) -> RecordResult<Vec<StoryStructure>> {
        let request = self
            .client
            .request_as(Method::POST, STORY_STRUCTURES_RPC, &caller.access_token)
            .json(&serde_json::json!({}));

        let rows: Vec<StructureRow> = self.rows(request).await?;
        Ok(rows.into_iter().map(|row| row.story_structure_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_eq_filter() {
        let id = ChildId::from_uuid(uuid::Uuid::nil());
        assert_eq!(eq(id), "eq.00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_insert_body_carries_owner() {
        let draft = ChildDraft {
            name: "Ada".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        let user_id = UserId::new();
        let body = serde_json::to_value(OwnedRow {
            draft: &draft,
            user_id,
        })
        .unwrap();

        assert_eq!(body["name"], "Ada");
        assert_eq!(body["birthdate"], "2020-01-01");
        assert_eq!(body["user_id"], user_id.to_string());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_update_request_is_scoped_by_owner() {
        let client = UpstreamClient::new(&platform::client::UpstreamConfig::new(
            "https://abcd.supabase.co",
            "anon",
        ))
        .unwrap();
        let repo = PostgrestRecords::new(client);
        let owner = Principal::new(UserId::new(), None, "jwt");
        let id = ChildId::new();
        let draft = ChildDraft {
            name: "Ada".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };

        let request = repo
            .update(CHILDREN_PATH, &owner, id, &draft)
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::PATCH);
        let query = request.url().query().unwrap_or_default().to_string();
        assert!(query.contains(&format!("id=eq.{}", id)));
        assert!(query.contains(&format!("user_id=eq.{}", owner.user_id)));
        assert_eq!(request.headers()["Prefer"], "return=representation");
        assert_eq!(request.headers()["apikey"], "anon");
    }

    #[test]
    fn test_structure_rows_decode() {
        let rows: Vec<StructureRow> = serde_json::from_str(
            r#"[{"story_structure_value":"hero_journey"},{"story_structure_value":"quest"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].story_structure_value.label(), "hero journey");
    }
}
