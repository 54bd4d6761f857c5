//! Post Reader Trait
//!
//! Interface for loading blog posts. Implementation is in infrastructure layer.

use crate::domain::post::Post;
use crate::error::CmsResult;

/// Post reader trait
#[trait_variant::make(PostReader: Send)]
pub trait LocalPostReader {
    /// Every readable post; entries that fail to parse are left out
    async fn all(&self) -> CmsResult<Vec<Post>>;

    /// One post by slug; `None` when no entry exists
    async fn read(&self, slug: &str) -> CmsResult<Option<Post>>;
}
