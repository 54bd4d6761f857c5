//! Blog Queries

use std::sync::Arc;

use crate::domain::post::{Post, PostSummary, is_valid_slug};
use crate::domain::reader::PostReader;
use crate::error::{CmsError, CmsResult};

/// Read-only blog queries over a post reader
pub struct BlogQueries<R: PostReader> {
    reader: Arc<R>,
}

impl<R: PostReader> BlogQueries<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// All posts, sorted by slug
    pub async fn list(&self) -> CmsResult<Vec<PostSummary>> {
        let mut posts: Vec<PostSummary> = self
            .reader
            .all()
            .await?
            .iter()
            .map(Post::summary)
            .collect();
        posts.sort_by(|a, b| a.slug.cmp(&b.slug));
        posts.dedup_by(|a, b| a.slug == b.slug);
        Ok(posts)
    }

    /// One post; unknown or malformed slugs are `NotFound`
    pub async fn post(&self, slug: &str) -> CmsResult<Post> {
        if !is_valid_slug(slug) {
            return Err(CmsError::NotFound(slug.to_string()));
        }

        self.reader
            .read(slug)
            .await?
            .ok_or_else(|| CmsError::NotFound(slug.to_string()))
    }
}
