//! Report listing entries that point at missing posts

use anyhow::Result;

use crate::content::{listing, PostSummary};
use crate::helpers::post_url;
use crate::Blog;

/// Listing entries without a content file
pub fn dangling(blog: &Blog) -> Vec<PostSummary> {
    let posts = blog.listing();
    listing::dangling_entries(&posts, &blog.loader())
        .into_iter()
        .cloned()
        .collect()
}

/// Print the dangling entries; fails when there are any
pub fn run(blog: &Blog) -> Result<()> {
    let missing = dangling(blog);
    if missing.is_empty() {
        println!("All listing entries have a matching post.");
        return Ok(());
    }

    println!("Listing entries without a post ({}):", missing.len());
    for post in &missing {
        println!(
            "  {} -> {} (expected {:?})",
            post.title,
            post_url(&blog.config, &post.slug),
            blog.loader().resolve(&post.slug).ok()
        );
    }
    anyhow::bail!("{} listing entries point to missing posts", missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check_flags_builtin_listing() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(dangling(&blog).len(), 3);
        assert!(run(&blog).is_err());
    }

    #[test]
    fn test_check_passes_for_content_listing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(crate::CONFIG_FILE),
            "listing:\n  source: content\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        fs::write(dir.path().join("content/a.md"), "---\ntitle: A\n---\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert!(dangling(&blog).is_empty());
        assert!(run(&blog).is_ok());
    }
}
