//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

use crate::application::BlogQueries;
use crate::domain::reader::PostReader;
use crate::error::CmsResult;
use crate::presentation::dto::{PostResponse, PostSummaryResponse};

/// Shared state for blog handlers
#[derive(Clone)]
pub struct CmsAppState<R>
where
    R: PostReader + Clone + Send + Sync + 'static,
{
    pub reader: Arc<R>,
}

impl<R> CmsAppState<R>
where
    R: PostReader + Clone + Send + Sync + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }

    fn queries(&self) -> BlogQueries<R> {
        BlogQueries::new(self.reader.clone())
    }
}

/// GET /blog
pub async fn list_posts<R>(
    State(state): State<CmsAppState<R>>,
) -> CmsResult<Json<Vec<PostSummaryResponse>>>
where
    R: PostReader + Clone + Send + Sync + 'static,
{
    let posts = state.queries().list().await?;
    tracing::debug!(count = posts.len(), "Listed posts");
    Ok(Json(posts.into_iter().map(PostSummaryResponse::from).collect()))
}

/// GET /blog/{slug}
pub async fn get_post<R>(
    State(state): State<CmsAppState<R>>,
    Path(slug): Path<String>,
) -> CmsResult<Json<PostResponse>>
where
    R: PostReader + Clone + Send + Sync + 'static,
{
    let post = state.queries().post(&slug).await?;
    Ok(Json(PostResponse::from(post)))
}
