//! Clean the public directory

use anyhow::{Context, Result};
use std::fs;

use crate::Site;

/// Remove the public directory
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)
            .with_context(|| format!("Failed to remove {:?}", site.public_dir))?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}
