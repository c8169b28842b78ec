//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::{PostSummary, UNKNOWN_AUTHOR, UNKNOWN_DATE};
use crate::Blog;

#[derive(Debug, Serialize)]
struct PostEntry {
    slug: String,
    title: String,
    description: String,
    author: Option<String>,
    date: Option<String>,
}

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let entries = post_entries(blog);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            println!("Posts ({}):", entries.len());
            for entry in entries {
                println!(
                    "  {} - {} [{}] by {}",
                    entry.date.as_deref().unwrap_or(UNKNOWN_DATE),
                    entry.title,
                    entry.slug,
                    entry.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
                );
            }
        }
        "listing" => {
            let posts: Vec<PostSummary> = blog.listing();
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            println!("Listing ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date, post.title, post.slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, listing",
                content_type
            );
        }
    }

    Ok(())
}

/// Every enumerated post with its raw metadata; unreadable files are skipped
fn post_entries(blog: &Blog) -> Vec<PostEntry> {
    let loader = blog.loader();
    loader
        .static_paths()
        .into_iter()
        .filter_map(|slug| match loader.load(&slug) {
            Ok(doc) => Some(PostEntry {
                slug: doc.slug,
                title: doc.metadata.title,
                description: doc.metadata.description,
                author: doc.metadata.author,
                date: doc.metadata.date,
            }),
            Err(e) => {
                tracing::warn!("Failed to load post {}: {}", slug, e);
                None
            }
        })
        .collect()
}
