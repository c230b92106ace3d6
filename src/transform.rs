//! Inline math rewriting
//!
//! Turns `$...$` spans in Markdown content into a `{% latex %}...{% endlatex %}`
//! tag pair for a later template stage to render. There is no escaping: every
//! `$` is a delimiter, and spans pair up left to right.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::config::MathConfig;
use crate::content::ContentUnit;

/// Format tag of Markdown content
pub const MARKDOWN_EXT: &str = ".md";

/// Default opening tag
pub const OPEN_TAG: &str = "{% latex %}";

/// Default closing tag
pub const CLOSE_TAG: &str = "{% endlatex %}";

lazy_static! {
    static ref DOLLAR_SPAN: Regex = Regex::new(r"\$([^$]*)\$").unwrap();
}

/// Rewrite `$...$` spans using the default tag pair.
///
/// Content whose tag is not exactly `.md` is returned untouched.
pub fn transform<'a>(content: &'a str, format_tag: &str) -> Cow<'a, str> {
    DollarToLatex::default().transform(content, format_tag)
}

/// Number of spans `transform` would rewrite.
pub fn count_spans(content: &str, format_tag: &str) -> usize {
    if !is_markdown(format_tag) {
        return 0;
    }
    DOLLAR_SPAN.find_iter(content).count()
}

/// Transform a content unit in place using the default tag pair.
///
/// Returns the number of spans rewritten.
pub fn transform_unit<U: ContentUnit + ?Sized>(unit: &mut U) -> usize {
    DollarToLatex::default().apply(unit)
}

fn is_markdown(format_tag: &str) -> bool {
    format_tag == MARKDOWN_EXT
}

/// Dollar-to-tag rewriter with a configurable tag pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DollarToLatex {
    open_tag: String,
    close_tag: String,
}

impl Default for DollarToLatex {
    fn default() -> Self {
        Self::new(OPEN_TAG, CLOSE_TAG)
    }
}

impl DollarToLatex {
    /// Create a rewriter emitting the given tags
    pub fn new(open_tag: impl Into<String>, close_tag: impl Into<String>) -> Self {
        Self {
            open_tag: open_tag.into(),
            close_tag: close_tag.into(),
        }
    }

    /// Build from the `math` section of the site config
    pub fn from_config(config: &MathConfig) -> Self {
        Self::new(&config.open_tag, &config.close_tag)
    }

    pub fn open_tag(&self) -> &str {
        &self.open_tag
    }

    pub fn close_tag(&self) -> &str {
        &self.close_tag
    }

    /// Rewrite every `$...$` span in Markdown content.
    pub fn transform<'a>(&self, content: &'a str, format_tag: &str) -> Cow<'a, str> {
        if !is_markdown(format_tag) {
            return Cow::Borrowed(content);
        }

        // A closure keeps `$` inside configured tags from being read as a group reference.
        DOLLAR_SPAN.replace_all(content, |caps: &Captures| {
            format!("{}{}{}", self.open_tag, &caps[1], self.close_tag)
        })
    }

    /// Rewrite the body of a content unit, storing the result back into it.
    pub fn apply<U: ContentUnit + ?Sized>(&self, unit: &mut U) -> usize {
        let tag = unit.format_tag().to_string();
        let count = count_spans(unit.content(), &tag);
        if count == 0 {
            return 0;
        }

        let rewritten = self.transform(unit.content(), &tag).into_owned();
        unit.set_content(rewritten);
        count
    }
}
