//! CMS Router
//!
//! Routes carry their full paths; merge into the app router rather than nest.

use axum::{Router, routing::get};

use crate::application::config::CmsConfig;
use crate::domain::reader::PostReader;
use crate::infra::fs::FsPostReader;
use crate::presentation::handlers::{self, CmsAppState};

/// Create the CMS router reading from the configured content directory
pub fn cms_router(config: CmsConfig) -> Router {
    let reader = FsPostReader::new(config.content_dir.clone());
    cms_router_generic(reader, &config)
}

/// Create a generic CMS router for any post reader
pub fn cms_router_generic<R>(reader: R, config: &CmsConfig) -> Router
where
    R: PostReader + Clone + Send + Sync + 'static,
{
    let state = CmsAppState::new(reader);

    let mut router = Router::new()
        // Site
        .route("/blog", get(handlers::list_posts::<R>))
        .route("/blog/{slug}", get(handlers::get_post::<R>));

    // Editor tooling, under the reserved prefix
    if let Some(api_path) = config.posts_api_path() {
        router = router
            .route(&api_path, get(handlers::list_posts::<R>))
            .route(&format!("{}/{{slug}}", api_path), get(handlers::get_post::<R>));
    }

    router.with_state(state)
}
