//! Filesystem Post Reader
//!
//! Reads the Keystatic posts collection straight from the content directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::domain::post::{Post, is_valid_slug};
use crate::domain::reader::PostReader;
use crate::error::{CmsError, CmsResult};

const EXTENSION: &str = "mdoc";
const INDEX_FILE: &str = "index.mdoc";

/// Filesystem-backed post reader
#[derive(Debug, Clone)]
pub struct FsPostReader {
    content_dir: PathBuf,
}

impl FsPostReader {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Candidate files for a slug, flat layout first
    fn candidates(&self, slug: &str) -> [PathBuf; 2] {
        [
            self.content_dir.join(format!("{}.{}", slug, EXTENSION)),
            self.content_dir.join(slug).join(INDEX_FILE),
        ]
    }

    /// Slug for a directory entry, if it is a post
    async fn entry_slug(path: &Path) -> Option<String> {
        let metadata = fs::metadata(path).await.ok()?;

        let slug = if metadata.is_dir() {
            if !fs::try_exists(path.join(INDEX_FILE)).await.unwrap_or(false) {
                return None;
            }
            path.file_name()?.to_str()?
        } else if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
            path.file_stem()?.to_str()?
        } else {
            return None;
        };

        is_valid_slug(slug).then(|| slug.to_string())
    }
}

impl PostReader for FsPostReader {
    async fn all(&self) -> CmsResult<Vec<Post>> {
        let mut entries = match fs::read_dir(&self.content_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %self.content_dir.display(), "Content directory missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut slugs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(slug) = Self::entry_slug(&entry.path()).await {
                slugs.push(slug);
            }
        }
        slugs.sort();
        slugs.dedup();

        let mut posts = Vec::with_capacity(slugs.len());
        for slug in slugs {
            match self.read(&slug).await {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(slug = %slug, error = %e, "Skipping unreadable post");
                }
            }
        }

        Ok(posts)
    }

    async fn read(&self, slug: &str) -> CmsResult<Option<Post>> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        for path in self.candidates(slug) {
            match fs::read_to_string(&path).await {
                Ok(source) => return Post::parse(slug, &source).map(Some),
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                    continue;
                }
                Err(e) => return Err(CmsError::Io(e)),
            }
        }

        Ok(None)
    }
}
