//! Home page listing

use super::{ContentLoader, PostSummary};
use crate::config::{ListingConfig, ListingSource};

/// Cards shown on the home page unless the site configures another source
const BUILTIN_POSTS: [(&str, &str, &str, &str, &str); 3] = [
    (
        "Understanding React Hooks",
        "A deep dive into the world of React Hooks and how they simplify state management in functional components.",
        "John Doe",
        "March 11, 2025",
        "understanding-react-hooks",
    ),
    (
        "Mastering JavaScript Closures",
        "A guide to understanding closures in JavaScript and their practical applications.",
        "Jane Smith",
        "March 10, 2025",
        "mastering-javascript-closures",
    ),
    (
        "CSS Grid vs Flexbox",
        "Comparing CSS Grid and Flexbox for modern web layout design and when to use each.",
        "Alex Johnson",
        "March 9, 2025",
        "css-grid-vs-flexbox",
    ),
];

pub fn builtin_posts() -> Vec<PostSummary> {
    BUILTIN_POSTS
        .iter()
        .map(|(title, description, author, date, slug)| PostSummary {
            title: title.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            date: date.to_string(),
            slug: slug.to_string(),
        })
        .collect()
}

/// Summaries for the home page from the configured source
pub fn listing_posts(config: &ListingConfig, loader: &ContentLoader) -> Vec<PostSummary> {
    match config.source {
        ListingSource::Builtin => builtin_posts(),
        ListingSource::Config => config.posts.clone(),
        ListingSource::Content => loader.load_summaries(),
    }
}

/// Listing entries whose slug has no content file.
///
/// Hand-authored listings are not tied to the content directory, so cards can
/// point at posts that do not exist. They are reported, not dropped.
pub fn dangling_entries<'a>(
    posts: &'a [PostSummary],
    loader: &ContentLoader,
) -> Vec<&'a PostSummary> {
    let slugs = loader.static_paths();
    posts
        .iter()
        .filter(|p| slugs.binary_search(&p.slug).is_err())
        .collect()
}
