//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use crate::transform::{CLOSE_TAG, OPEN_TAG};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub posts_dir: String,

    // Content
    /// Extensions (without dot) loaded as pages and posts
    pub page_extensions: Vec<String>,
    /// Glob patterns relative to the source directory
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Also process posts with `published: false`
    pub unpublished: bool,

    #[serde(default)]
    pub math: MathConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            posts_dir: "_posts".to_string(),

            page_extensions: vec!["md".to_string(), "markdown".to_string(), "html".to_string()],
            exclude: Vec::new(),
            unpublished: false,

            math: MathConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Reject settings that would make the build read or write outside its directories
    pub fn validate(&self) -> Result<()> {
        let mut named = false;
        for component in Path::new(&self.posts_dir).components() {
            match component {
                Component::Normal(_) => named = true,
                Component::CurDir => {}
                _ => anyhow::bail!(
                    "posts_dir {:?} must stay inside source_dir",
                    self.posts_dir
                ),
            }
        }
        if !named {
            anyhow::bail!(
                "posts_dir {:?} must name a directory inside source_dir",
                self.posts_dir
            );
        }
        Ok(())
    }

    /// Whether a file extension (without dot) marks a content file
    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.page_extensions.iter().any(|e| e == ext)
    }
}

/// Inline math rewrite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub enable: bool,
    pub open_tag: String,
    pub close_tag: String,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enable: true,
            open_tag: OPEN_TAG.to_string(),
            close_tag: CLOSE_TAG.to_string(),
        }
    }
}
