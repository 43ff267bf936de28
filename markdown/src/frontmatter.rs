//! The `---`-delimited metadata block at the top of a post file.
//!
//! ```text
//! ---
//! title: 'Spaces vs. Tabs'
//! publishedAt: 2024-04-08
//! summary: The answer nobody asked for.
//! image: /images/tabs.png
//! ---
//! Post body in Markdown...
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A\s*---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)")
        .expect("frontmatter pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("no frontmatter block at the start of the file")]
    Missing,
    #[error("frontmatter is missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("line {line} is not a `key: value` pair: {text}")]
    MalformedLine { line: usize, text: String },
}

/// Post metadata read from the frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    /// Raw publication date as written, e.g. `2024-04-08`.
    pub published_at: String,
    pub summary: String,
    pub image: Option<String>,
}

/// A post file split into its metadata and the Markdown that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub metadata: Metadata,
    pub content: &'a str,
}

/// Splits `source` into frontmatter metadata and the remaining Markdown.
///
/// `title` and `publishedAt` are required. Values wrapped in matching single
/// or double quotes are unquoted, unknown keys are ignored and `#` starts a
/// comment line.
///
/// # Errors
///
/// Returns [`FrontmatterError`] when the block is absent, a line has no
/// `key: value` shape, or a required key is missing or empty.
pub fn parse(source: &str) -> Result<Document<'_>, FrontmatterError> {
    let captures = BLOCK.captures(source).ok_or(FrontmatterError::Missing)?;
    let block = captures.get(1).map_or("", |m| m.as_str());
    let body_start = captures.get(0).map_or(0, |m| m.end());

    let mut title = None;
    let mut published_at = None;
    let mut metadata = Metadata::default();

    for (index, line) in block.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(FrontmatterError::MalformedLine {
                // +1 for the opening fence, +1 for one-based numbering
                line: index + 2,
                text: line.to_owned(),
            });
        };
        let value = unquote(value.trim());
        match key.trim() {
            "title" => title = Some(value),
            "publishedAt" | "published_at" => published_at = Some(value),
            "summary" => metadata.summary = value,
            "image" => metadata.image = Some(value).filter(|v| !v.is_empty()),
            _ => {}
        }
    }

    metadata.title = title
        .filter(|v| !v.is_empty())
        .ok_or(FrontmatterError::MissingKey("title"))?;
    metadata.published_at = published_at
        .filter(|v| !v.is_empty())
        .ok_or(FrontmatterError::MissingKey("publishedAt"))?;

    Ok(Document {
        metadata,
        content: source[body_start..].trim(),
    })
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    let quoted = bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'')
        && bytes[bytes.len() - 1] == bytes[0];
    if quoted {
        value[1..value.len() - 1].to_owned()
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\ntitle: 'Spaces vs. Tabs'\npublishedAt: 2024-04-08\nsummary: \"Settling it: once and for all\"\nimage: /images/tabs.png\n---\n\n# Heading\n\nBody text.\n";

    #[test]
    fn test_parse_full_frontmatter() {
        let doc = parse(POST).unwrap();
        assert_eq!(doc.metadata.title, "Spaces vs. Tabs");
        assert_eq!(doc.metadata.published_at, "2024-04-08");
        assert_eq!(doc.metadata.summary, "Settling it: once and for all");
        assert_eq!(doc.metadata.image.as_deref(), Some("/images/tabs.png"));
        assert_eq!(doc.content, "# Heading\n\nBody text.");
    }

    #[test]
    fn test_optional_keys_default() {
        let doc = parse("---\ntitle: Hi\npublishedAt: 2023-01-01\n---\nbody").unwrap();
        assert_eq!(doc.metadata.summary, "");
        assert_eq!(doc.metadata.image, None);
        assert_eq!(doc.content, "body");
    }

    #[test]
    fn test_crlf_and_comments() {
        let doc = parse("---\r\n# draft notes\r\ntitle: Windows\r\npublishedAt: 2023-05-05\r\n---\r\ntext").unwrap();
        assert_eq!(doc.metadata.title, "Windows");
        assert_eq!(doc.content, "text");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let doc = parse("---\ntitle: T\npublishedAt: 2023-01-01\ntags: rust\n---\n").unwrap();
        assert_eq!(doc.metadata.title, "T");
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(parse("# Just markdown"), Err(FrontmatterError::Missing));
    }

    #[test]
    fn test_missing_required_keys() {
        assert_eq!(
            parse("---\npublishedAt: 2023-01-01\n---\n"),
            Err(FrontmatterError::MissingKey("title"))
        );
        assert_eq!(
            parse("---\ntitle: ''\npublishedAt: 2023-01-01\n---\n"),
            Err(FrontmatterError::MissingKey("title"))
        );
        assert_eq!(
            parse("---\ntitle: T\n---\n"),
            Err(FrontmatterError::MissingKey("publishedAt"))
        );
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let err = parse("---\ntitle: T\nnot a pair\n---\n").unwrap_err();
        assert_eq!(
            err,
            FrontmatterError::MalformedLine {
                line: 3,
                text: "not a pair".to_owned()
            }
        );
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'mismatched\""), "'mismatched\"");
        assert_eq!(unquote("'"), "'");
    }
}
