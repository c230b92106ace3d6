//! List site content and the math each unit carries

use anyhow::Result;
use serde::Serialize;

use crate::content::{ContentKind, ContentLoader, ContentUnit};
use crate::transform::count_spans;
use crate::Site;

/// One row of `list` output
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub kind: ContentKind,
    pub source: String,
    pub title: String,
    pub format_tag: String,
    /// Spans a build would rewrite
    pub spans: usize,
}

impl ListEntry {
    fn from_unit<U: ContentUnit>(unit: &U, title: &str) -> Self {
        Self {
            kind: unit.kind(),
            source: unit.source().to_string(),
            title: title.to_string(),
            format_tag: unit.format_tag().to_string(),
            spans: count_spans(unit.content(), unit.format_tag()),
        }
    }
}

/// Collect entries for a content type (post, page, all)
pub fn collect(site: &Site, content_type: &str) -> Result<Vec<ListEntry>> {
    site.config.validate()?;
    let loader = ContentLoader::new(site);
    let mut entries = Vec::new();

    let (pages, posts) = match content_type {
        "post" | "posts" => (false, true),
        "page" | "pages" => (true, false),
        "all" => (true, true),
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, all",
                content_type
            );
        }
    };

    if pages {
        entries.extend(
            loader
                .load_pages()
                .iter()
                .map(|p| ListEntry::from_unit(p, &p.title)),
        );
    }
    if posts {
        entries.extend(
            loader
                .load_posts()
                .iter()
                .map(|p| ListEntry::from_unit(p, &p.title)),
        );
    }

    Ok(entries)
}

/// List site content by type
pub fn run(site: &Site, content_type: &str, json: bool) -> Result<()> {
    let entries = collect(site, content_type)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Content ({}):", entries.len());
    for entry in &entries {
        println!(
            "  {:<4} {} - {} [{}] {} math",
            entry.kind.as_str(),
            entry.title,
            entry.source,
            entry.format_tag,
            entry.spans
        );
    }

    Ok(())
}
