//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use kernel::id::{ChildId, StoryId};
use kernel::principal::Principal;
use serde::Serialize;
use std::sync::Arc;

use crate::application::config::RecordsConfig;
use crate::application::{AccountQueries, FormOutcome, SaveChildUseCase, SaveStoryUseCase};
use crate::domain::form::{ChildForm, StoryForm};
use crate::domain::repository::{ChildRepository, StoryRepository, StoryStructureRepository};
use crate::error::RecordResult;
use crate::presentation::dto::{
    AccountResponse, AccountUserResponse, ChildResponse, FailedResponse, NotFoundResponse,
    RejectedResponse, SavedResponse, StoryOptionsResponse, StoryResponse,
};

/// Shared state for record handlers
#[derive(Clone)]
pub struct RecordsAppState<R>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<RecordsConfig>,
}

impl<R> RecordsAppState<R>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: RecordsConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }

    fn queries(&self) -> AccountQueries<R> {
        AccountQueries::new(self.repo.clone())
    }
}

/// Render a form outcome: 201/200 saved, 422 rejected, 500 failed, 404 not found
fn outcome_response<T, F, B>(outcome: FormOutcome<T, F>, body: impl FnOnce(&T) -> B) -> Response
where
    F: Serialize,
    B: Serialize,
{
    match outcome {
        FormOutcome::Saved {
            record,
            created,
            toast,
            redirect_to,
        } => {
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            let response = SavedResponse {
                toast,
                redirect_to,
                record: body(&record),
            };
            (status, Json(response)).into_response()
        }
        FormOutcome::Rejected { field_errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RejectedResponse { field_errors }),
        )
            .into_response(),
        FormOutcome::Failed { toast, values } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailedResponse { toast, values }),
        )
            .into_response(),
        FormOutcome::NotFound { redirect_to } => not_found_response(redirect_to),
    }
}

fn not_found_response(redirect_to: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not found",
            redirect_to,
        }),
    )
        .into_response()
}

// ============================================================================
// Account views
// ============================================================================

/// GET /account
pub async fn account_overview<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
) -> RecordResult<Json<AccountResponse>>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let overview = state.queries().overview(&principal).await?;
    let today = Utc::now().date_naive();

    Ok(Json(AccountResponse {
        user: AccountUserResponse::from(&principal),
        children: overview
            .children
            .iter()
            .map(|c| ChildResponse::from_child(c, today))
            .collect(),
        stories: overview.stories.iter().map(StoryResponse::from).collect(),
    }))
}

/// GET /account/children
pub async fn list_children<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
) -> RecordResult<Json<Vec<ChildResponse>>>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let today = Utc::now().date_naive();
    let children = state.queries().children(&principal).await?;

    Ok(Json(
        children
            .iter()
            .map(|c| ChildResponse::from_child(c, today))
            .collect(),
    ))
}

/// GET /account/children/{id}
///
/// Unknown or foreign ids send the browser back to the children list.
pub async fn get_child<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
    Path(id): Path<String>,
) -> RecordResult<Response>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let child = match id.parse::<ChildId>() {
        Ok(id) => state.queries().child(&principal, id).await?,
        Err(_) => None,
    };

    Ok(match child {
        Some(child) => {
            Json(ChildResponse::from_child(&child, Utc::now().date_naive())).into_response()
        }
        None => Redirect::to(&state.config.children_redirect).into_response(),
    })
}

/// GET /account/stories
pub async fn list_stories<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
) -> RecordResult<Json<Vec<StoryResponse>>>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let stories = state.queries().stories(&principal).await?;
    Ok(Json(stories.iter().map(StoryResponse::from).collect()))
}

/// GET /account/stories/{id}
pub async fn get_story<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
    Path(id): Path<String>,
) -> RecordResult<Response>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let story = match id.parse::<StoryId>() {
        Ok(id) => state.queries().story(&principal, id).await?,
        Err(_) => None,
    };

    Ok(match story {
        Some(story) => Json(StoryResponse::from(&story)).into_response(),
        None => Redirect::to(&state.config.stories_redirect).into_response(),
    })
}

/// GET /api/story-structures
pub async fn story_options<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
) -> RecordResult<Json<StoryOptionsResponse>>
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let options = state.queries().story_options(&principal).await?;
    Ok(Json(StoryOptionsResponse::from(options)))
}

// ============================================================================
// Children
// ============================================================================

/// POST /api/children
pub async fn create_child<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
    Json(form): Json<ChildForm>,
) -> Response
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let use_case = SaveChildUseCase::new(state.repo.clone(), state.config.clone());
    let outcome = use_case.execute(&principal, None, form).await;
    let today = Utc::now().date_naive();
    outcome_response(outcome, |child| ChildResponse::from_child(child, today))
}

/// PATCH /api/children/{id}
pub async fn update_child<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
    Path(id): Path<String>,
    Json(form): Json<ChildForm>,
) -> Response
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    // A malformed id cannot match any row
    let Ok(id) = id.parse::<ChildId>() else {
        return not_found_response(state.config.children_redirect.clone());
    };

    let use_case = SaveChildUseCase::new(state.repo.clone(), state.config.clone());
    let outcome = use_case.execute(&principal, Some(id), form).await;
    let today = Utc::now().date_naive();
    outcome_response(outcome, |child| ChildResponse::from_child(child, today))
}

// ============================================================================
// Stories
// ============================================================================

/// POST /api/stories
pub async fn create_story<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
    Json(form): Json<StoryForm>,
) -> Response
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let use_case = SaveStoryUseCase::new(state.repo.clone(), state.config.clone());
    let outcome = use_case.execute(&principal, None, form).await;
    outcome_response(outcome, |story| StoryResponse::from(story))
}

/// PATCH /api/stories/{id}
pub async fn update_story<R>(
    State(state): State<RecordsAppState<R>>,
    principal: Principal,
    Path(id): Path<String>,
    Json(form): Json<StoryForm>,
) -> Response
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let Ok(id) = id.parse::<StoryId>() else {
        return not_found_response(state.config.stories_redirect.clone());
    };

    let use_case = SaveStoryUseCase::new(state.repo.clone(), state.config.clone());
    let outcome = use_case.execute(&principal, Some(id), form).await;
    outcome_response(outcome, |story| StoryResponse::from(story))
}
