//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Delete the static export
pub fn run(blog: &Blog) -> Result<()> {
    if blog.public_dir.exists() {
        fs::remove_dir_all(&blog.public_dir)?;
        tracing::info!("Deleted: {:?}", blog.public_dir);
    }

    Ok(())
}
