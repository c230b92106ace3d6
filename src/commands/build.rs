//! Rewrite site content into the public directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::content::{ContentLoader, ContentUnit};
use crate::transform::DollarToLatex;
use crate::Site;

/// Counts from a single build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub posts: usize,
    pub static_files: usize,
    /// Math spans rewritten across all units
    pub spans: usize,
}

impl BuildReport {
    pub fn summary(&self) -> String {
        format!(
            "{} pages, {} posts, {} static files, {} math spans",
            self.pages, self.posts, self.static_files, self.spans
        )
    }
}

/// Load pages and posts, rewrite their math, and write everything out
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();
    site.config.validate()?;

    let loader = ContentLoader::new(site);
    let mut pages = loader.load_pages();
    let mut posts = loader.load_posts();
    let static_files = loader.static_files();

    tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

    let rewriter = if site.config.math.enable {
        Some(DollarToLatex::from_config(&site.config.math))
    } else {
        tracing::info!("Math rewriting disabled, copying content through");
        None
    };

    let mut report = BuildReport {
        pages: pages.len(),
        posts: posts.len(),
        static_files: static_files.len(),
        spans: 0,
    };

    // Pages first, then posts
    for page in pages.iter_mut() {
        report.spans += process(site, rewriter.as_ref(), page)?;
    }
    for post in posts.iter_mut() {
        report.spans += process(site, rewriter.as_ref(), post)?;
    }

    for relative in &static_files {
        let from = site.source_dir.join(relative);
        let to = output_path(site, relative)?;
        ensure_parent(&to)?;
        fs::copy(&from, &to).with_context(|| format!("Failed to copy {:?}", from))?;
    }

    let duration = start.elapsed();
    tracing::info!("Built in {:.2}s: {}", duration.as_secs_f64(), report.summary());

    Ok(report)
}

/// Rewrite one unit and write it to its place under the public directory
fn process<U: ContentUnit>(
    site: &Site,
    rewriter: Option<&DollarToLatex>,
    unit: &mut U,
) -> Result<usize> {
    let spans = rewriter.map(|r| r.apply(unit)).unwrap_or(0);
    if spans > 0 {
        tracing::debug!(
            "Rewrote {} math spans in {} {}",
            spans,
            unit.kind().as_str(),
            unit.source()
        );
    }

    let output = output_path(site, Path::new(unit.source()))?;
    ensure_parent(&output)?;
    fs::write(&output, unit.render()).with_context(|| format!("Failed to write {:?}", output))?;

    Ok(spans)
}

/// Where a source-relative path lands, refusing anything that leaves the public directory
fn output_path(site: &Site, relative: &Path) -> Result<PathBuf> {
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        anyhow::bail!(
            "Refusing to write {:?} outside {:?}",
            relative,
            site.public_dir
        );
    }
    Ok(site.public_dir.join(relative))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).unwrap()
    }

    #[test]
    fn test_build_rewrites_markdown() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "source/about.md",
            "---\ntitle: Cost $5\n---\nArea $\\pi r^2$ and $$.\n",
        );
        write(dir.path(), "source/raw.html", "<p>$x$</p>");
        write(dir.path(), "source/_posts/2024-01-15-post.html", "a $x$ b $y$ c");
        write(dir.path(), "source/img/logo.svg", "<svg>$</svg>");

        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());
        let report = run(&site).unwrap();

        assert_eq!(
            report,
            BuildReport {
                pages: 2,
                posts: 1,
                static_files: 1,
                spans: 4,
            }
        );

        let public = site.public_dir.as_path();
        assert_eq!(
            read(public, "about.md"),
            "---\ntitle: Cost $5\n---\nArea {% latex %}\\pi r^2{% endlatex %} and {% latex %}{% endlatex %}.\n"
        );
        assert_eq!(read(public, "raw.html"), "<p>$x$</p>");
        assert_eq!(
            read(public, "_posts/2024-01-15-post.html"),
            "a {% latex %}x{% endlatex %} b {% latex %}y{% endlatex %} c"
        );
        assert_eq!(read(public, "img/logo.svg"), "<svg>$</svg>");
    }

    #[test]
    fn test_build_with_math_disabled() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "source/index.md", "$x$");

        let mut config = SiteConfig::default();
        config.math.enable = false;
        let site = Site::with_config(dir.path().to_path_buf(), config);
        let report = run(&site).unwrap();

        assert_eq!(report.spans, 0);
        assert_eq!(read(&site.public_dir, "index.md"), "$x$");
    }

    #[test]
    fn test_build_with_custom_tags() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "source/index.md", "$x$");

        let mut config = SiteConfig::default();
        config.math.open_tag = "{% math %}".to_string();
        config.math.close_tag = "{% endmath %}".to_string();
        let site = Site::with_config(dir.path().to_path_buf(), config);
        run(&site).unwrap();

        assert_eq!(
            read(&site.public_dir, "index.md"),
            "{% math %}x{% endmath %}"
        );
    }

    #[test]
    fn test_posts_dir_outside_source_leaves_source_alone() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "source/index.md", "$y$");
        write(dir.path(), "posts/2024-01-01-a.md", "$x$");

        let config = SiteConfig {
            posts_dir: "../posts".to_string(),
            ..Default::default()
        };
        let site = Site::with_config(dir.path().to_path_buf(), config);

        assert!(run(&site).is_err());
        assert_eq!(read(dir.path(), "posts/2024-01-01-a.md"), "$x$");
        assert!(!site.public_dir.exists());
    }

    #[test]
    fn test_output_path_stays_in_public_dir() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());

        assert_eq!(
            output_path(&site, Path::new("_posts/a.md")).unwrap(),
            site.public_dir.join("_posts/a.md")
        );
        assert!(output_path(&site, Path::new("../posts/a.md")).is_err());
        assert!(output_path(&site, Path::new("a/../../b.md")).is_err());
        assert!(output_path(&site, &dir.path().join("abs.md")).is_err());
    }

    #[test]
    fn test_posts_dir_without_underscore_counted_once() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "source/posts/2024-01-01-a.html", "$x$");

        let config = SiteConfig {
            posts_dir: "posts".to_string(),
            ..Default::default()
        };
        let site = Site::with_config(dir.path().to_path_buf(), config);
        let report = run(&site).unwrap();

        assert_eq!(
            report,
            BuildReport {
                pages: 0,
                posts: 1,
                static_files: 0,
                spans: 1,
            }
        );
        assert_eq!(
            read(&site.public_dir, "posts/2024-01-01-a.html"),
            "{% latex %}x{% endlatex %}"
        );
    }

    #[test]
    fn test_non_utf8_content_copied_through() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "source/index.md", "$x$");
        let bytes = [0xff, 0xfe, b'$', b'x', b'$'];
        fs::write(dir.path().join("source/blob.md"), bytes).unwrap();

        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());
        let report = run(&site).unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(report.static_files, 1);
        assert_eq!(fs::read(site.public_dir.join("blob.md")).unwrap(), bytes);
    }

    #[test]
    fn test_rebuild_skips_public_dir_inside_source() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "site/index.md", "$x$");

        let config = SiteConfig {
            source_dir: "site".to_string(),
            public_dir: "site/_out".to_string(),
            ..Default::default()
        };
        let site = Site::with_config(dir.path().to_path_buf(), config);
        run(&site).unwrap();
        let report = run(&site).unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(
            read(&site.public_dir, "index.md"),
            "{% latex %}x{% endlatex %}"
        );
    }
}
