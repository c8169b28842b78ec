//! Post models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FrontMatter;

/// Shown on a post page when the front-matter has no author
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Shown on a post page when the front-matter has no date
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Typed front-matter of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub title: String,
    pub description: String,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl PostMetadata {
    /// Build from parsed front-matter; a missing title falls back to the slug
    pub fn from_front_matter(fm: &FrontMatter, slug: &str) -> Self {
        Self {
            title: fm.title.clone().unwrap_or_else(|| slug.to_string()),
            description: fm.description.clone().unwrap_or_default(),
            author: fm.author.clone(),
            date: fm.date.clone(),
        }
    }
}

/// A markdown document from the content directory
#[derive(Debug, Clone)]
pub struct PostDocument {
    /// File name without the `.md` extension
    pub slug: String,

    pub metadata: PostMetadata,

    /// Raw markdown after the front-matter block
    pub body: String,
}

/// HTML produced by the render pipeline from repository-controlled files.
///
/// Templates inject it without escaping. It can only be built inside this
/// crate, so arbitrary strings never end up marked as safe markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub(crate) fn from_pipeline(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A post rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub metadata: PostMetadata,
    pub content: TrustedHtml,
}

impl RenderedPage {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn author(&self) -> &str {
        self.metadata.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn date(&self) -> &str {
        self.metadata.date.as_deref().unwrap_or(UNKNOWN_DATE)
    }
}

/// Title and description for page headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

impl PageMeta {
    /// Fallback used whenever a post's metadata cannot be read
    pub fn not_found() -> Self {
        Self {
            title: "Post Not Found".to_string(),
            description: "The requested blog post does not exist.".to_string(),
        }
    }
}

/// A card on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: String,
    pub slug: String,
}

impl PostSummary {
    /// Summary for a document, with the same fallbacks as the post page
    pub fn from_document(doc: &PostDocument) -> Self {
        let meta = &doc.metadata;
        Self {
            title: meta.title.clone(),
            description: meta.description.clone(),
            author: meta
                .author
                .clone()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            date: meta.date.clone().unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            slug: doc.slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(author: Option<&str>, date: Option<&str>) -> RenderedPage {
        RenderedPage {
            slug: "s".to_string(),
            metadata: PostMetadata {
                title: "T".to_string(),
                description: "D".to_string(),
                author: author.map(str::to_string),
                date: date.map(str::to_string),
            },
            content: TrustedHtml::from_pipeline("<p>x</p>".to_string()),
        }
    }

    #[test]
    fn test_rendered_page_fallbacks() {
        let p = page(None, None);
        assert_eq!(p.author(), "Unknown");
        assert_eq!(p.date(), "Unknown Date");

        let p = page(Some("Jane"), Some("March 10, 2025"));
        assert_eq!(p.author(), "Jane");
        assert_eq!(p.date(), "March 10, 2025");
    }

    #[test]
    fn test_metadata_title_falls_back_to_slug() {
        let fm = FrontMatter::default();
        let meta = PostMetadata::from_front_matter(&fm, "my-post");
        assert_eq!(meta.title, "my-post");
        assert_eq!(meta.description, "");
        assert_eq!(meta.author, None);
    }

    #[test]
    fn test_trusted_html_serializes_as_string() {
        let html = TrustedHtml::from_pipeline("<b>hi</b>".to_string());
        assert_eq!(serde_json::to_string(&html).unwrap(), r#""<b>hi</b>""#);
    }
}
