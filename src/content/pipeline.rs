//! Slug → rendered page

use super::{ContentLoader, MarkdownRenderer, PageMeta, RenderedPage, TrustedHtml};
use crate::config::HighlightConfig;
use crate::error::{ContentError, NotFound};

/// Loads a post by slug and runs it through the markdown renderer.
///
/// Holds no per-request state; one instance is shared by every render.
pub struct RenderPipeline {
    loader: ContentLoader,
    renderer: MarkdownRenderer,
}

impl RenderPipeline {
    pub fn new(loader: ContentLoader, highlight: &HighlightConfig) -> Result<Self, ContentError> {
        Ok(Self {
            loader,
            renderer: MarkdownRenderer::new(highlight)?,
        })
    }

    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    /// Render a post. Every failure is logged and reported as `NotFound`.
    pub fn render_post(&self, slug: &str) -> Result<RenderedPage, NotFound> {
        self.try_render(slug).map_err(|e| {
            log_failure("Rendering", slug, &e);
            NotFound::new(slug)
        })
    }

    fn try_render(&self, slug: &str) -> Result<RenderedPage, ContentError> {
        let doc = self.loader.load(slug)?;
        let html = self.renderer.render(&doc.body)?;
        Ok(RenderedPage {
            slug: doc.slug,
            metadata: doc.metadata,
            content: TrustedHtml::from_pipeline(html),
        })
    }

    /// Title and description for page headers; falls back to a fixed pair
    pub fn post_metadata(&self, slug: &str) -> PageMeta {
        match self.loader.load(slug) {
            Ok(doc) => PageMeta {
                title: doc.metadata.title,
                description: doc.metadata.description,
            },
            Err(e) => {
                log_failure("Metadata for", slug, &e);
                PageMeta::not_found()
            }
        }
    }

    /// Every slug that can be rendered
    pub fn static_paths(&self) -> Vec<String> {
        self.loader.static_paths()
    }
}

/// Absent posts are routine; anything else is worth an error line
fn log_failure(action: &str, slug: &str, e: &ContentError) {
    if is_absent(e) {
        tracing::debug!("{} {:?} failed: {}", action, slug, e);
    } else {
        tracing::error!("{} {:?} failed: {}", action, slug, e);
    }
}

fn is_absent(e: &ContentError) -> bool {
    matches!(
        e,
        ContentError::Missing { .. } | ContentError::InvalidSlug(_)
    )
}
