//! Content loader - resolves slugs to markdown files in the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, PostDocument, PostMetadata, PostSummary};
use crate::error::ContentError;

/// Extension of content files; the slug is the file name without it
pub const CONTENT_EXTENSION: &str = "md";

/// Read-only view over the content directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_dir: PathBuf,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Path of the file a slug names. Slugs that could escape the content
    /// directory are rejected.
    pub fn resolve(&self, slug: &str) -> Result<PathBuf, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }
        Ok(self
            .content_dir
            .join(format!("{}.{}", slug, CONTENT_EXTENSION)))
    }

    /// Load and split a document
    pub fn load(&self, slug: &str) -> Result<PostDocument, ContentError> {
        let path = self.resolve(slug)?;
        if !path.is_file() {
            return Err(ContentError::Missing {
                slug: slug.to_string(),
                path,
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content);
        tracing::debug!("Loaded {:?}", path);

        Ok(PostDocument {
            slug: slug.to_string(),
            metadata: PostMetadata::from_front_matter(&fm, slug),
            body: body.to_string(),
        })
    }

    /// All slugs in the content directory, sorted.
    ///
    /// A missing or unreadable directory means "no content", never an error.
    pub fn static_paths(&self) -> Vec<String> {
        if !self.content_dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.content_dir);
            return Vec::new();
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::error!("Error listing {:?}: {}", self.content_dir, e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            if let Some(slug) = path.file_stem().and_then(|s| s.to_str()) {
                slugs.push(slug.to_string());
            }
        }

        slugs.sort();
        slugs
    }

    /// Summaries of every document, newest first; undated posts go last
    pub fn load_summaries(&self) -> Vec<PostSummary> {
        let mut docs: Vec<(Option<chrono::NaiveDateTime>, PostSummary)> = Vec::new();
        for slug in self.static_paths() {
            match self.load(&slug) {
                Ok(doc) => {
                    let date = doc
                        .metadata
                        .date
                        .as_deref()
                        .and_then(super::frontmatter::parse_date_string);
                    docs.push((date, PostSummary::from_document(&doc)));
                }
                Err(e) => tracing::warn!("Skipping {} in listing: {}", slug, e),
            }
        }

        docs.sort_by(|(da, a), (db, b)| db.cmp(da).then_with(|| a.slug.cmp(&b.slug)));
        docs.into_iter().map(|(_, summary)| summary).collect()
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == CONTENT_EXTENSION)
        .unwrap_or(false)
}

/// A slug must name a file directly inside the content directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}
