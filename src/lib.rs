//! mdblog: a small markdown blog
//!
//! A home page listing posts and a per-post page rendered from
//! `<content_dir>/<slug>.md`, with syntax-highlighted code blocks that carry
//! a copy button. Pages are served on demand or exported to static files.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, PostSummary, RenderPipeline};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts
    pub content_dir: PathBuf,
    /// Static export output
    pub public_dir: PathBuf,
    /// Files served and exported as-is
    pub static_dir: PathBuf,
}

impl Blog {
    /// Open a site from a directory; a missing _config.yml means defaults
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(&self.content_dir)
    }

    /// Build the render pipeline; fails on an unknown highlight theme
    pub fn pipeline(&self) -> Result<RenderPipeline> {
        Ok(RenderPipeline::new(self.loader(), &self.config.highlight)?)
    }

    /// Cards for the home page
    pub fn listing(&self) -> Vec<PostSummary> {
        content::listing::listing_posts(&self.config.listing, &self.loader())
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
