//! Error types for content loading and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or rendering a post
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("No content file for slug {slug:?} at {path:?}")]
    Missing { slug: String, path: PathBuf },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown highlight theme: {0}")]
    UnknownTheme(String),

    #[error("Highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// The only failure a full post render ever reports to its caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Post not found: {slug}")]
pub struct NotFound {
    pub slug: String,
}

impl NotFound {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}
