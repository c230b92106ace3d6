//! Content module - pages, posts, and how they are loaded

mod frontmatter;
pub mod loader;
mod unit;

pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, LoadError};
pub use unit::{ContentKind, ContentUnit, Page, Post};
pub(crate) use unit::extension_tag;
