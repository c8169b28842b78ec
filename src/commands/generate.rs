//! Export the site to static files

use anyhow::Result;
use notify::Watcher;
use std::fs;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;
use walkdir::WalkDir;

use crate::helpers::POST_DIR;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// What an export produced
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Post pages written
    pub posts: usize,
    /// Slugs that failed to render
    pub skipped: Vec<String>,
    /// Files copied from the static directory
    pub assets: usize,
}

/// Render the listing page, every post and the 404 page into the public directory
pub fn run(blog: &Blog) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let pipeline = blog.pipeline()?;
    let templates = TemplateRenderer::new(&blog.config)?;
    let mut report = GenerateReport::default();

    fs::create_dir_all(&blog.public_dir)?;

    let posts = blog.listing();
    let index = templates.render_index(&posts)?;
    write_file(&blog.public_dir.join("index.html"), &index)?;

    for slug in pipeline.static_paths() {
        let page = match pipeline.render_post(&slug) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", slug, e);
                report.skipped.push(slug);
                continue;
            }
        };
        let meta = pipeline.post_metadata(&slug);
        let html = templates.render_post(&meta, &page)?;

        // Hrefs are percent-encoded; static hosts decode them back to the raw slug
        let output_path = blog
            .public_dir
            .join(POST_DIR)
            .join(&slug)
            .join("index.html");
        write_file(&output_path, &html)?;
        report.posts += 1;
    }

    write_file(
        &blog.public_dir.join("404.html"),
        &templates.render_not_found()?,
    )?;

    report.assets = copy_static(&blog.static_dir, &blog.public_dir)?;

    tracing::info!(
        "Generated {} posts ({} skipped, {} assets) in {:.2}s",
        report.posts,
        report.skipped.len(),
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

/// Copy the static directory into the public directory
fn copy_static(static_dir: &Path, public_dir: &Path) -> Result<usize> {
    if !static_dir.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(static_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let relative = path.strip_prefix(static_dir)?;
        let target = public_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)?;
        copied += 1;
    }

    Ok(copied)
}

/// Watch for file changes and regenerate
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if blog.content_dir.exists() {
        watcher.watch(&blog.content_dir, notify::RecursiveMode::Recursive)?;
    }
    if blog.static_dir.exists() {
        watcher.watch(&blog.static_dir, notify::RecursiveMode::Recursive)?;
    }
    let config_path = blog.config_path();
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let blog = blog.clone();
    tokio::task::spawn_blocking(move || {
        let mut last_rebuild = std::time::Instant::now();

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(_event) => {
                    // Debounce: only rebuild if more than 500ms since last rebuild
                    if last_rebuild.elapsed() > Duration::from_millis(500) {
                        tracing::info!("File changed, regenerating...");
                        // Pick up config edits too
                        match Blog::new(&blog.base_dir).and_then(|b| run(&b)) {
                            Ok(_) => {}
                            Err(e) => tracing::error!("Generation failed: {}", e),
                        }
                        last_rebuild = std::time::Instant::now();
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    })
    .await?;

    // Keep the watcher alive for the whole loop
    drop(watcher);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir(&content).unwrap();
        fs::write(
            content.join("first.md"),
            "---\ntitle: First\ndescription: One\n---\nHello\n",
        )
        .unwrap();
        fs::write(content.join("second.md"), "No front-matter at all.\n").unwrap();
        fs::write(content.join("notes.txt"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join("static/img")).unwrap();
        fs::write(dir.path().join("static/img/logo.svg"), "<svg/>").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_generate_writes_every_page() {
        let (_dir, blog) = site();
        let report = run(&blog).unwrap();

        assert_eq!(report.posts, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(report.assets, 1);

        let public = &blog.public_dir;
        assert!(public.join("index.html").is_file());
        assert!(public.join("404.html").is_file());
        assert!(public.join("img/logo.svg").is_file());
        assert!(!public.join("blogpost/notes").exists());

        let first = fs::read_to_string(public.join("blogpost/first/index.html")).unwrap();
        assert!(first.contains("<title>First</title>"));
        let second = fs::read_to_string(public.join("blogpost/second/index.html")).unwrap();
        assert!(second.contains("<title>second</title>"));
        assert!(second.contains("No front-matter at all."));
    }

    #[test]
    fn test_generate_is_reproducible() {
        let (_dir, blog) = site();
        run(&blog).unwrap();
        let path = blog.public_dir.join("blogpost/first/index.html");
        let before = fs::read(&path).unwrap();
        run(&blog).unwrap();
        assert_eq!(before, fs::read(&path).unwrap());
    }

    #[test]
    fn test_generate_without_content() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let report = run(&blog).unwrap();
        assert_eq!(report, GenerateReport::default());
        assert!(blog.public_dir.join("index.html").is_file());
    }

    #[tokio::test]
    async fn test_exported_links_resolve_on_a_static_host() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower_http::services::ServeDir;

        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(crate::CONFIG_FILE),
            "listing:\n  source: content\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        fs::write(
            dir.path().join("content/a b.md"),
            "---\ntitle: Spaced\n---\nHi\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        run(&blog).unwrap();

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(index.contains(r#"href="/blogpost/a%20b""#));
        assert!(blog.public_dir.join("blogpost/a b/index.html").is_file());

        let mut host = ServeDir::new(&blog.public_dir);
        let request = Request::builder()
            .uri("/blogpost/a%20b/")
            .body(Body::empty())
            .unwrap();
        let response = host.try_call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/blogpost/a%20b")
            .body(Body::empty())
            .unwrap();
        let response = host.try_call(request).await.unwrap();
        assert_ne!(response.status(), StatusCode::NOT_FOUND);
    }
}
