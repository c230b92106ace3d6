//! Front-matter splitting and parsing

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Front-matter data from a post or page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    /// Content is published by default
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            published: true,
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Split a file into its raw front-matter block and body.
    ///
    /// The block opens with a `---` line and closes with a `---` or `...`
    /// line; trailing whitespace on either fence is allowed. The block keeps
    /// both fences and the newline after the closing one, so `block + body`
    /// reproduces the input exactly.
    pub fn split(content: &str) -> (Option<&str>, &str) {
        let Some(first_end) = content.find('\n') else {
            return (None, content);
        };
        if content[..first_end].trim_end() != "---" {
            return (None, content);
        }

        let mut pos = first_end + 1;
        while pos < content.len() {
            let line_end = content[pos..]
                .find('\n')
                .map(|i| pos + i + 1)
                .unwrap_or(content.len());
            if matches!(content[pos..line_end].trim_end(), "---" | "...") {
                return (Some(&content[..line_end]), &content[line_end..]);
            }
            pos = line_end;
        }

        (None, content)
    }

    /// Parse the YAML inside a raw block returned by [`FrontMatter::split`].
    ///
    /// Malformed YAML yields the defaults, the block itself is kept verbatim
    /// by the caller either way.
    pub fn parse(block: &str) -> Self {
        let mut lines: Vec<&str> = block.lines().skip(1).collect();
        lines.pop();
        let yaml = lines.join("\n");

        if yaml.trim().is_empty() {
            return FrontMatter::default();
        }

        match serde_yaml::from_str::<FrontMatter>(&yaml) {
            Ok(fm) => fm,
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, using defaults: {}", e);
                FrontMatter::default()
            }
        }
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string in various formats
pub(crate) fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for fmt in formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Local));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.and_local_timezone(Local).earliest();
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_block() {
        let content = "---\ntitle: Hello\n---\nBody $x$\n";
        let (block, body) = FrontMatter::split(content);
        assert_eq!(block, Some("---\ntitle: Hello\n---\n"));
        assert_eq!(body, "Body $x$\n");
    }

    #[test]
    fn test_split_without_front_matter() {
        let content = "Just $x$ text\n---\nmore\n";
        let (block, body) = FrontMatter::split(content);
        assert!(block.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_unclosed_block() {
        let content = "---\ntitle: Hello\nno closing fence";
        let (block, body) = FrontMatter::split(content);
        assert!(block.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_empty_block() {
        let (block, body) = FrontMatter::split("---\n---\nbody");
        assert_eq!(block, Some("---\n---\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_ignores_rule_inside_yaml_value() {
        let content = "---\ntitle: a---b\n---\nbody";
        let (block, body) = FrontMatter::split(content);
        assert_eq!(block, Some("---\ntitle: a---b\n---\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_crlf() {
        let content = "---\r\ntitle: Hello\r\n---\r\nbody";
        let (block, body) = FrontMatter::split(content);
        assert_eq!(block, Some("---\r\ntitle: Hello\r\n---\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_relaxed_fences() {
        let content = "--- \ntitle: Cost $5\n...\t\nBody $x$\n";
        let (block, body) = FrontMatter::split(content);
        assert_eq!(block, Some("--- \ntitle: Cost $5\n...\t\n"));
        assert_eq!(body, "Body $x$\n");
        assert_eq!(
            FrontMatter::parse(block.unwrap()).title,
            Some("Cost $5".to_string())
        );
    }

    #[test]
    fn test_split_requires_fence_at_line_start() {
        let content = "---\ntitle: T\n ---\nbody";
        let (block, _) = FrontMatter::split(content);
        assert!(block.is_none());

        let (block, _) = FrontMatter::split("----\ntitle: T\n---\n");
        assert!(block.is_none());
    }

    #[test]
    fn test_parse_block() {
        let fm = FrontMatter::parse("---\ntitle: Hello World\ndate: 2024-01-15 10:30:00\npublished: false\nmathjax: true\n---\n");
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert!(!fm.published);
        assert!(fm.extra.contains_key("mathjax"));
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_parse_malformed_yaml_falls_back() {
        let fm = FrontMatter::parse("---\ntitle: [unclosed\n---\n");
        assert_eq!(fm.title, None);
        assert!(fm.published);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_date_string("2023-07-04").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2023-07-04");
        assert!(parse_date_string("yesterday").is_none());
    }
}
