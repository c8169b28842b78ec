//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Options for a new post
#[derive(Debug, Default, Clone)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub slug: Option<&'a str>,
    pub author: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Create `<content_dir>/<slug>.md` with front-matter filled in
pub fn create_post(blog: &Blog, post: &NewPost<'_>) -> Result<PathBuf> {
    let slug = match post.slug {
        Some(s) => s.to_string(),
        None => slug::slugify(post.title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", post.title);
    }

    let file_path = blog.loader().resolve(&slug)?;
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }
    fs::create_dir_all(&blog.content_dir)?;

    let date = chrono::Local::now().format("%B %-d, %Y").to_string();
    let mut content = String::from("---\n");
    content.push_str(&format!("title: {}\n", yaml_string(post.title)));
    content.push_str(&format!(
        "description: {}\n",
        yaml_string(post.description.unwrap_or(""))
    ));
    if let Some(author) = post.author {
        content.push_str(&format!("author: {}\n", yaml_string(author)));
    }
    content.push_str(&format!("date: {}\n", yaml_string(&date)));
    content.push_str("---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a value so titles with colons or quotes stay valid YAML
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_post(
            &blog,
            &NewPost {
                title: "Rust: A \"Gentle\" Intro",
                author: Some("Ann"),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(path, blog.content_dir.join("rust-a-gentle-intro.md"));

        let doc = blog.loader().load("rust-a-gentle-intro").unwrap();
        assert_eq!(doc.metadata.title, "Rust: A \"Gentle\" Intro");
        assert_eq!(doc.metadata.author.as_deref(), Some("Ann"));
        assert!(doc.metadata.date.is_some());
        assert!(crate::content::parse_date_string(doc.metadata.date.as_deref().unwrap()).is_some());
    }

    #[test]
    fn test_refuses_overwrite_and_bad_slug() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let post = NewPost {
            title: "Same",
            ..Default::default()
        };
        create_post(&blog, &post).unwrap();
        assert!(create_post(&blog, &post).is_err());

        let post = NewPost {
            title: "Escape",
            slug: Some("../escape"),
            ..Default::default()
        };
        assert!(create_post(&blog, &post).is_err());
    }
}
