//! Transform a single file or stdin

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::content::extension_tag;
use crate::transform::{DollarToLatex, MARKDOWN_EXT};
use crate::Site;

/// Rewrite one input and return the result.
///
/// The format tag is `ext` when given, else the file's own extension, else
/// `.md` for stdin.
pub fn run(site: &Site, input: Option<&Path>, ext: Option<&str>) -> Result<String> {
    let (content, own_ext) = match input {
        Some(path) => {
            let content =
                fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
            (content, extension_tag(path))
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            (content, MARKDOWN_EXT.to_string())
        }
    };

    let tag = ext.map(normalize_ext).unwrap_or(own_ext);
    tracing::debug!("Transforming with format tag {:?}", tag);

    Ok(transform_str(site, &content, &tag))
}

/// Rewrite text with the site's configured tags
pub fn transform_str(site: &Site, content: &str, format_tag: &str) -> String {
    if !site.config.math.enable {
        return content.to_string();
    }
    DollarToLatex::from_config(&site.config.math)
        .transform(content, format_tag)
        .into_owned()
}

/// Accept `md` as well as `.md`
fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') || ext.is_empty() {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
