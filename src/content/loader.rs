//! Content loader - loads posts, pages, and static files from the source directory

use glob::Pattern;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{FrontMatter, Page, Post};
use crate::Site;

/// Failure to load a single content file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not valid UTF-8: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Content is not valid UTF-8: {0:?}")]
    NotUtf8(PathBuf),

    #[error("{0:?} is outside the source directory")]
    OutsideSource(PathBuf),
}

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    exclude: Vec<Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let exclude = site
            .config
            .exclude
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();
        Self { site, exclude }
    }

    /// Load all posts from the posts directory
    pub fn load_posts(&self) -> Vec<Post> {
        if !self.site.posts_dir.exists() {
            return Vec::new();
        }

        let mut posts = Vec::new();

        for path in self.walk(&self.site.posts_dir) {
            if !self.is_content_file(&path) {
                continue;
            }
            match self.load_post(&path) {
                Ok(post) => {
                    if post.published || self.site.config.unpublished {
                        posts.push(post);
                    } else {
                        tracing::debug!("Skipping unpublished post {}", post.source);
                    }
                }
                Err(LoadError::NotUtf8(path)) => {
                    tracing::debug!("Copying non-UTF-8 post {:?} as a static file", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to load post: {}", e);
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        posts
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post, LoadError> {
        let (source, text) = self.read(path)?;
        let (block, body) = FrontMatter::split(&text);

        let mut post = Post::new(source, body);
        post.full_source = path.to_path_buf();
        if let Some(block) = block {
            post.apply_front_matter(&FrontMatter::parse(block));
            post.front_matter = Some(block.to_string());
        }

        Ok(post)
    }

    /// Load all pages (content files outside `_`-prefixed directories and the posts directory)
    pub fn load_pages(&self) -> Vec<Page> {
        let mut pages = Vec::new();

        for path in self.walk(&self.site.source_dir) {
            if self.is_special(&path) || !self.is_content_file(&path) {
                continue;
            }
            match self.load_page(&path) {
                Ok(page) => pages.push(page),
                Err(LoadError::NotUtf8(path)) => {
                    tracing::debug!("Copying non-UTF-8 page {:?} as a static file", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to load page: {}", e);
                }
            }
        }

        pages.sort_by(|a, b| a.source.cmp(&b.source));

        pages
    }

    /// Load a single page from a file
    pub fn load_page(&self, path: &Path) -> Result<Page, LoadError> {
        let (source, text) = self.read(path)?;
        let (block, body) = FrontMatter::split(&text);

        let mut page = Page::new(source, body);
        page.full_source = path.to_path_buf();
        if let Some(block) = block {
            if let Some(title) = FrontMatter::parse(block).title {
                page.title = title;
            }
            page.front_matter = Some(block.to_string());
        }

        Ok(page)
    }

    /// Files copied through untouched, as paths relative to the source directory.
    ///
    /// Includes pages and posts that are not valid UTF-8, since those cannot
    /// be loaded as text.
    pub fn static_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .walk(&self.site.source_dir)
            .into_iter()
            .filter(|path| {
                if self.is_content_file(path) {
                    let loaded = !self.is_special(path) || self.is_post(path);
                    loaded && !is_utf8(path)
                } else {
                    !self.is_special(path)
                }
            })
            .filter_map(|path| {
                path.strip_prefix(&self.site.source_dir)
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect();
        files.sort();
        files
    }

    /// Walk a directory, returning files that are not excluded
    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| !self.is_excluded(path))
            .collect()
    }

    fn read(&self, path: &Path) -> Result<(String, String), LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text =
            String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8(path.to_path_buf()))?;

        let source = path
            .strip_prefix(&self.site.source_dir)
            .map_err(|_| LoadError::OutsideSource(path.to_path_buf()))?
            .to_str()
            .ok_or_else(|| LoadError::InvalidPath(path.to_path_buf()))?
            .replace('\\', "/");

        Ok((source, text))
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.site.config.is_content_extension(e))
            .unwrap_or(false)
    }

    fn is_post(&self, path: &Path) -> bool {
        path.starts_with(&self.site.posts_dir)
    }

    /// In the posts directory or under a `_`-prefixed top-level directory
    fn is_special(&self, path: &Path) -> bool {
        if self.is_post(path) {
            return true;
        }
        let relative = path.strip_prefix(&self.site.source_dir).unwrap_or(path);
        relative
            .components()
            .next()
            .and_then(|c| c.as_os_str().to_str())
            .map(|first| first.starts_with('_'))
            .unwrap_or(false)
    }

    /// Dotfiles, the output directory, and configured exclude patterns
    fn is_excluded(&self, path: &Path) -> bool {
        if path.starts_with(&self.site.public_dir) {
            return true;
        }

        // Only components below the source directory count as hidden
        let Ok(relative) = path.strip_prefix(&self.site.source_dir) else {
            return false;
        };
        let hidden = relative.components().any(|c| match c {
            Component::Normal(name) => name.to_str().map(|n| n.starts_with('.')).unwrap_or(false),
            _ => false,
        });
        if hidden {
            return true;
        }

        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn is_utf8(path: &Path) -> bool {
    fs::read(path)
        .map(|bytes| std::str::from_utf8(&bytes).is_ok())
        .unwrap_or(true)
}
