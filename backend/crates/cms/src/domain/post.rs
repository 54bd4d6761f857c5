//! Blog Post Entity
//!
//! A post file is YAML frontmatter fenced by `---` lines followed by the
//! Markdoc body.

use serde::Deserialize;

use crate::error::{CmsError, CmsResult};

/// A full blog post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub featured_image: Option<String>,
    /// Markdoc source, unrendered
    pub content: String,
}

/// Listing entry for a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub featured_image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    title: String,
    #[serde(default)]
    featured_image: Option<String>,
}

impl Post {
    /// Parse a post file's contents
    pub fn parse(slug: impl Into<String>, source: &str) -> CmsResult<Self> {
        let slug = slug.into();
        let Some((yaml, body)) = split_frontmatter(source) else {
            return Err(CmsError::Frontmatter {
                slug,
                message: "missing frontmatter fence".to_string(),
            });
        };

        let meta: Frontmatter = match serde_yaml::from_str(yaml) {
            Ok(meta) => meta,
            Err(e) => {
                return Err(CmsError::Frontmatter {
                    slug,
                    message: e.to_string(),
                });
            }
        };

        Ok(Self {
            slug,
            title: meta.title,
            featured_image: meta.featured_image.filter(|s| !s.trim().is_empty()),
            content: body.trim_start_matches(['\r', '\n']).to_string(),
        })
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            featured_image: self.featured_image.clone(),
        }
    }
}

/// Split `---\n<yaml>\n---\n<body>` into its two halves
fn split_frontmatter(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = source.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Slugs are single path segments of lowercase letters, digits, `-` and `_`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}
