//! dollar-latex: inline math preprocessing for static sites
//!
//! Walks a site's pages and posts and rewrites `$...$` spans into a
//! `{% latex %}...{% endlatex %}` tag pair that the site's template stage
//! renders later. Posts are always treated as Markdown; pages only when their
//! own extension is `.md`.

pub mod commands;
pub mod config;
pub mod content;
pub mod transform;

use anyhow::Result;
use std::path::Path;

pub use transform::{count_spans, transform, transform_unit, DollarToLatex};

/// A site on disk and its configuration
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Source directory
    pub source_dir: std::path::PathBuf,
    /// Posts directory
    pub posts_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Open a site rooted at a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.validate()?;

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an already loaded configuration
    pub fn with_config(base_dir: std::path::PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let posts_dir = source_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
            public_dir,
        }
    }

    /// Rewrite all content into the public directory
    pub fn build(&self) -> Result<commands::build::BuildReport> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
