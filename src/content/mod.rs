//! Content module - posts, front-matter, markdown rendering and the home listing

mod frontmatter;
pub mod listing;
mod loader;
mod markdown;
mod pipeline;
mod post;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::{ContentLoader, CONTENT_EXTENSION};
pub use markdown::MarkdownRenderer;
pub use pipeline::RenderPipeline;
pub use post::{
    PageMeta, PostDocument, PostMetadata, PostSummary, RenderedPage, TrustedHtml, UNKNOWN_AUTHOR,
    UNKNOWN_DATE,
};
