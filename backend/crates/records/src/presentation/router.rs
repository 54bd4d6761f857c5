//! Records Router
//!
//! Routes carry their full paths; merge into the app router rather than nest.

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::application::config::RecordsConfig;
use crate::domain::repository::{ChildRepository, StoryRepository, StoryStructureRepository};
use crate::presentation::handlers::{self, RecordsAppState};

/// Create the Records router for any repository implementation
pub fn records_router<R>(repo: R, config: RecordsConfig) -> Router
where
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let state = RecordsAppState::new(repo, config);

    Router::new()
        // Account views
        .route("/account", get(handlers::account_overview::<R>))
        .route("/account/children", get(handlers::list_children::<R>))
        .route("/account/children/{id}", get(handlers::get_child::<R>))
        .route("/account/stories", get(handlers::list_stories::<R>))
        .route("/account/stories/{id}", get(handlers::get_story::<R>))
        .route("/api/story-structures", get(handlers::story_options::<R>))
        // Record API
        .route("/api/children", post(handlers::create_child::<R>))
        .route("/api/children/{id}", patch(handlers::update_child::<R>))
        .route("/api/stories", post(handlers::create_story::<R>))
        .route("/api/stories/{id}", patch(handlers::update_story::<R>))
        .with_state(state)
}
