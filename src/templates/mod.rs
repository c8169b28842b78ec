//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on for every
//! value; only the pipeline's trusted post HTML goes through `safe`.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{PageMeta, PostSummary, RenderedPage};
use crate::helpers::{full_url_for, post_path, post_url, url_for};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
    config: SiteConfig,
    site: SiteData,
    home_url: String,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("404.html", include_str!("blog/404.html")),
            // Partials
            (
                "partials/theme_script.html",
                include_str!("blog/partials/theme_script.html"),
            ),
            (
                "partials/mode_toggle.html",
                include_str!("blog/partials/mode_toggle.html"),
            ),
            (
                "partials/style.html",
                include_str!("blog/partials/style.html"),
            ),
        ])?;

        Ok(Self {
            tera,
            config: config.clone(),
            site: SiteData::from_config(config),
            home_url: url_for(config, "/"),
        })
    }

    /// Home page with one card per summary
    pub fn render_index(&self, posts: &[PostSummary]) -> Result<String> {
        let cards: Vec<CardData> = posts
            .iter()
            .map(|p| CardData {
                title: &p.title,
                description: &p.description,
                author: &p.author,
                date: &p.date,
                url: post_url(&self.config, &p.slug),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &cards);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Detail page; `meta` fills the document head
    pub fn render_post(&self, meta: &PageMeta, page: &RenderedPage) -> Result<String> {
        let post = PostView {
            title: page.title(),
            description: page.description(),
            author: page.author(),
            date: page.date(),
            content: page.content.as_str(),
        };

        let canonical = full_url_for(&self.config, &post_path(&page.slug));

        let mut context = self.base_context();
        context.insert("meta", meta);
        context.insert("post", &post);
        context.insert("canonical", &canonical);
        Ok(self.tera.render("post.html", &context)?)
    }

    pub fn render_not_found(&self) -> Result<String> {
        let mut context = self.base_context();
        context.insert("meta", &PageMeta::not_found());
        Ok(self.tera.render("404.html", &context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("home_url", &self.home_url);
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub default_mode: &'static str,
}

impl SiteData {
    fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            default_mode: config.default_mode.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CardData<'a> {
    title: &'a str,
    description: &'a str,
    author: &'a str,
    date: &'a str,
    url: String,
}

#[derive(Debug, Serialize)]
struct PostView<'a> {
    title: &'a str,
    description: &'a str,
    author: &'a str,
    date: &'a str,
    content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{listing, PostMetadata, TrustedHtml};

    fn page(author: Option<&str>) -> RenderedPage {
        RenderedPage {
            slug: "p".to_string(),
            metadata: PostMetadata {
                title: "Fish & <Chips>".to_string(),
                description: "Tasty".to_string(),
                author: author.map(str::to_string),
                date: None,
            },
            content: TrustedHtml::from_pipeline("<p>Hello <em>there</em></p>".to_string()),
        }
    }

    #[test]
    fn test_render_index() {
        let config = SiteConfig::default();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let html = renderer
            .render_index(&listing::builtin_posts())
            .unwrap();
        assert!(html.contains("<h1 class=\"listing-title\">Blogs</h1>"));
        assert!(html.contains("Understanding React Hooks"));
        assert!(html.contains("By John Doe • March 11, 2025"));
        assert!(html.contains(r#"href="/blogpost/css-grid-vs-flexbox""#));
        assert_eq!(html.matches("Click here").count(), 3);
    }

    #[test]
    fn test_render_post_escapes_metadata_not_content() {
        let config = SiteConfig::default();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let meta = PageMeta {
            title: "Fish & <Chips>".to_string(),
            description: "Tasty".to_string(),
        };
        let html = renderer.render_post(&meta, &page(None)).unwrap();

        assert!(html.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
        assert!(html.contains("Fish &amp; &lt;Chips&gt;</h1>"));
        assert!(html.contains("<p>Hello <em>there</em></p>"));
        assert!(html.contains("<span>By Unknown</span>"));
        assert!(html.contains("<span>Unknown Date</span>"));
        assert!(html.contains(r#"<article class="prose">"#));
        assert!(html.contains(r#"href="/""#));
        assert!(html.contains(r#"<link rel="canonical" href="http://localhost:3000/blogpost/p">"#));
    }

    #[test]
    fn test_render_not_found() {
        let config = SiteConfig::default();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let html = renderer.render_not_found().unwrap();
        assert!(html.contains("<title>Post Not Found</title>"));
        assert!(html.contains("404"));
    }

    #[test]
    fn test_default_mode_and_toggle() {
        let mut config = SiteConfig::default();
        config.default_mode = crate::config::ColorMode::Dark;
        let renderer = TemplateRenderer::new(&config).unwrap();
        let html = renderer.render_index(&[]).unwrap();
        assert!(html.contains(r#"data-default-mode="dark""#));
        assert!(html.contains("mode-toggle"));
        assert!(html.contains("No posts yet."));
    }
}
