//! Data Transfer Objects

use serde::Serialize;

use crate::domain::post::{Post, PostSummary};

/// Blog listing entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryResponse {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

impl From<PostSummary> for PostSummaryResponse {
    fn from(summary: PostSummary) -> Self {
        Self {
            slug: summary.slug,
            title: summary.title,
            featured_image: summary.featured_image,
        }
    }
}

/// Full blog post
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub content: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            featured_image: post.featured_image,
            content: post.content,
        }
    }
}
