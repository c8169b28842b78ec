//! Front-matter parsing

use chrono::{NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Front-matter data from a post.
///
/// Values are untyped at the source, so every known key is coerced to a
/// string when it holds a scalar and ignored otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,

    /// Additional custom fields
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string.
    /// Returns (front_matter, remaining_content).
    ///
    /// Never fails: a missing, unterminated or malformed block yields empty
    /// front-matter and the whole input as content.
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some((yaml, body)) = split_block(content) else {
            return (FrontMatter::default(), content);
        };
        let body = body.trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        match serde_yaml::from_str::<Value>(yaml) {
            Ok(Value::Mapping(map)) => (Self::from_mapping(map), body),
            Ok(Value::Null) => (FrontMatter::default(), body),
            Ok(other) => {
                tracing::warn!(
                    "Front-matter is not a key/value mapping ({:?}), treating as content",
                    value_kind(&other)
                );
                (FrontMatter::default(), content)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    fn from_mapping(map: Mapping) -> Self {
        let mut fm = FrontMatter::default();
        for (key, value) in map {
            let Some(key) = scalar_to_string(&key) else {
                continue;
            };
            match key.as_str() {
                "title" => fm.title = scalar_to_string(&value),
                "description" => fm.description = scalar_to_string(&value),
                "author" => fm.author = scalar_to_string(&value),
                "date" => fm.date = scalar_to_string(&value),
                _ => {
                    fm.extra.insert(key, value);
                }
            }
        }
        fm
    }
}

/// Split `---\n<yaml>\n---\n<body>` into its two halves
fn split_block(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']).trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // "March 11, 2025" is how posts are usually dated
    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
description: A first post
author: Jane Smith
date: March 10, 2025
tags:
  - rust
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.description.as_deref(), Some("A first post"));
        assert_eq!(fm.author.as_deref(), Some("Jane Smith"));
        assert_eq!(fm.date.as_deref(), Some("March 10, 2025"));
        assert!(fm.extra.contains_key("tags"));
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nBody.";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unterminated_block_is_content() {
        let content = "---\ntitle: Oops\n\nNo closing fence.";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_malformed_yaml_falls_back_to_empty() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_empty_block() {
        let (fm, remaining) = FrontMatter::parse("---\n---\nBody");
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_scalar_values_are_coerced() {
        let content = "---\ntitle: 2024\ndate: 2025-03-11\ndescription: true\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("2024"));
        assert_eq!(fm.date.as_deref(), Some("2025-03-11"));
        assert_eq!(fm.description.as_deref(), Some("true"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(remaining, "Body\r\n");
    }

    #[test]
    fn test_parse_date() {
        let dt = parse_date_string("March 11, 2025").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-03-11");

        assert!(parse_date_string("2024-01-15 10:30:00").is_some());
        assert!(parse_date_string("sometime soon").is_none());
    }
}
