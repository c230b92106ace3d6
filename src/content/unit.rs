//! Page and Post models

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::FrontMatter;
use crate::transform::MARKDOWN_EXT;

/// Which collection a content unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Standalone page, transformed only when its own extension is Markdown
    Page,
    /// Blog post, always transformed as Markdown
    Post,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Page => "page",
            ContentKind::Post => "post",
        }
    }
}

/// A text body with a format tag, owned by the build
pub trait ContentUnit {
    /// Page or post
    fn kind(&self) -> ContentKind;

    /// Source path relative to the source directory
    fn source(&self) -> &str;

    /// Format tag the math rewrite is keyed on
    fn format_tag(&self) -> &str;

    /// Body text, without front-matter
    fn content(&self) -> &str;

    /// Replace the body text
    fn set_content(&mut self, content: String);

    /// Raw front-matter block, fences included
    fn front_matter(&self) -> Option<&str>;

    /// Front-matter followed by body, as written to disk
    fn render(&self) -> String {
        match self.front_matter() {
            Some(fm) => format!("{}{}", fm, self.content()),
            None => self.content().to_string(),
        }
    }
}

/// A standalone page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// File extension with leading dot, empty if none
    pub ext: String,

    /// Raw front-matter block
    pub front_matter: Option<String>,

    /// Body text
    pub content: String,
}

impl Page {
    /// Create a page from a relative source path and its body
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            title: file_stem(&source),
            ext: extension_tag(Path::new(&source)),
            full_source: PathBuf::from(&source),
            source,
            front_matter: None,
            content: content.into(),
        }
    }
}

impl ContentUnit for Page {
    fn kind(&self) -> ContentKind {
        ContentKind::Page
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn format_tag(&self) -> &str {
        &self.ext
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn front_matter(&self) -> Option<&str> {
        self.front_matter.as_deref()
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Slug from the filename, without the date prefix
    pub slug: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Actual file extension, which never affects the rewrite
    pub ext: String,

    /// Whether the post is published
    pub published: bool,

    /// Raw front-matter block
    pub front_matter: Option<String>,

    /// Body text
    pub content: String,
}

impl Post {
    /// Create a post from a relative source path and its body.
    ///
    /// Date and slug come from a `YYYY-MM-DD-slug` filename when present.
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        let source = source.into();
        let stem = file_stem(&source);
        let (date, slug) = match parse_post_filename(&stem) {
            Some((date, slug)) => (date, slug),
            None => (Local::now(), stem.clone()),
        };

        Self {
            title: slug.clone(),
            date,
            slug,
            ext: extension_tag(Path::new(&source)),
            full_source: PathBuf::from(&source),
            source,
            published: true,
            front_matter: None,
            content: content.into(),
        }
    }

    /// Fill title, date, and published flag from front-matter
    pub fn apply_front_matter(&mut self, fm: &FrontMatter) {
        if let Some(title) = &fm.title {
            self.title = title.clone();
        }
        if let Some(date) = fm.parse_date() {
            self.date = date;
        }
        self.published = fm.published;
    }
}

impl ContentUnit for Post {
    fn kind(&self) -> ContentKind {
        ContentKind::Post
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn format_tag(&self) -> &str {
        MARKDOWN_EXT
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn front_matter(&self) -> Option<&str> {
        self.front_matter.as_deref()
    }
}

/// Extension with a leading dot, as the format tag expects
pub(crate) fn extension_tag(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

fn file_stem(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// Split `2024-01-15-hello-world` into a date and `hello-world`
fn parse_post_filename(stem: &str) -> Option<(DateTime<Local>, String)> {
    let prefix = stem.get(..10)?;
    let slug = stem.get(10..)?.strip_prefix('-')?;
    if slug.is_empty() {
        return None;
    }

    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    let date = date.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest()?;
    Some((date, slug.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_format_tag_is_extension() {
        assert_eq!(Page::new("about.md", "").format_tag(), ".md");
        assert_eq!(Page::new("docs/index.html", "").format_tag(), ".html");
        assert_eq!(Page::new("notes.markdown", "").format_tag(), ".markdown");
        assert_eq!(Page::new("LICENSE", "").format_tag(), "");
    }

    #[test]
    fn test_post_format_tag_is_markdown() {
        let post = Post::new("_posts/2024-01-15-hello.html", "");
        assert_eq!(post.ext, ".html");
        assert_eq!(post.format_tag(), ".md");
    }

    #[test]
    fn test_post_filename_date_and_slug() {
        let post = Post::new("_posts/2024-01-15-hello-world.md", "");
        assert_eq!(post.date.format("%Y-%m-%d").to_string(), "2024-01-15");
        assert_eq!(post.slug, "hello-world");
    }

    #[test]
    fn test_post_filename_without_date() {
        let post = Post::new("_posts/hello.md", "");
        assert_eq!(post.slug, "hello");
        assert!(parse_post_filename("2024-13-40-bad").is_none());
        assert!(parse_post_filename("2024-01-15").is_none());
    }

    #[test]
    fn test_front_matter_overrides_post_fields() {
        let mut post = Post::new("_posts/2024-01-15-hello.md", "");
        let fm = FrontMatter {
            title: Some("Hello".to_string()),
            date: Some("2024-02-01".to_string()),
            published: false,
            ..Default::default()
        };
        post.apply_front_matter(&fm);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date.format("%Y-%m-%d").to_string(), "2024-02-01");
        assert!(!post.published);
    }

    #[test]
    fn test_render_keeps_front_matter() {
        let mut page = Page::new("a.md", "body");
        assert_eq!(page.render(), "body");
        page.front_matter = Some("---\ntitle: A\n---\n".to_string());
        assert_eq!(page.render(), "---\ntitle: A\n---\nbody");
    }
}
