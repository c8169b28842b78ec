//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::PostSummary;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Appearance
    pub default_mode: ColorMode,
    pub highlight: HighlightConfig,

    // Home page
    pub listing: ListingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: "Blog App".to_string(),
            language: "en".to_string(),

            url: "http://localhost:3000".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            default_mode: ColorMode::System,
            highlight: HighlightConfig::default(),

            listing: ListingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        // An empty file is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Initial color scheme before the reader picks one with the toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
    System,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
            ColorMode::System => "system",
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a syntect default theme
    pub theme: String,
    pub line_number: bool,
    pub copy_button: CopyButtonConfig,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
            copy_button: CopyButtonConfig::default(),
        }
    }
}

/// Copy-to-clipboard button attached to every code block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyButtonConfig {
    pub enable: bool,
    pub visibility: CopyVisibility,
    /// How long the "Copied" feedback stays visible, in milliseconds
    pub feedback_duration: u64,
}

impl Default for CopyButtonConfig {
    fn default() -> Self {
        Self {
            enable: true,
            visibility: CopyVisibility::Always,
            feedback_duration: 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyVisibility {
    Always,
    Hover,
}

impl CopyVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            CopyVisibility::Always => "always",
            CopyVisibility::Hover => "hover",
        }
    }
}

/// Where the home page gets its post cards from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub source: ListingSource,
    /// Used when `source` is `config`
    pub posts: Vec<PostSummary>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            source: ListingSource::Builtin,
            posts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    /// Summaries compiled into the binary
    Builtin,
    /// `listing.posts` from _config.yml
    Config,
    /// Derived from the content directory
    Content,
}
