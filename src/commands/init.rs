//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# mdblog configuration

# Site
title: Blog
description: Blog App
language: en

# URL
url: http://localhost:3000
root: /

# Directory
content_dir: content
public_dir: public
static_dir: static

# light | dark | system
default_mode: system

highlight:
  theme: base16-ocean.dark
  line_number: false
  copy_button:
    enable: true
    visibility: always
    feedback_duration: 3000

# builtin | config | content
listing:
  source: content
"#;

const WELCOME_POST: &str = r#"---
title: Hello, world
description: The first post on this blog.
author: Admin
date: January 1, 2025
---

Posts live in `content/<slug>.md` and are served at `/blogpost/<slug>`.

```rust
fn main() {
    println!("Hello, world!");
}
```
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content"))?;
    fs::create_dir_all(target_dir.join("static"))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let welcome = target_dir.join("content/hello-world.md");
    if !welcome.exists() {
        fs::write(&welcome, WELCOME_POST)?;
    }

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListingSource;
    use crate::Blog;

    #[test]
    fn test_init_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.listing.source, ListingSource::Content);
        assert_eq!(blog.loader().static_paths(), vec!["hello-world"]);

        let page = blog.pipeline().unwrap().render_post("hello-world").unwrap();
        assert_eq!(page.title(), "Hello, world");
        assert!(page.content.as_str().contains("copy-button"));

        assert!(init_site(dir.path()).is_err());
    }
}
