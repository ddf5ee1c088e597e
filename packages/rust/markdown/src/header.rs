//! Header-derived page names.
//!
//! A document whose first line is `# Some Title` can be published as
//! `Some-Title.md` instead of its flattened path name.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// A filename taken from the document's leading `# Header` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderName {
    /// Sanitized filename including the `.md` extension.
    pub filename: String,
    /// Document content with the header line removed.
    pub body: String,
}

/// Look at line 1 only; return the candidate filename and the remaining lines.
///
/// `None` when the first line is not an H1 or the title sanitizes to nothing.
pub fn extract_header_name(content: &str) -> Option<HeaderName> {
    static H1_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^#\s+(.*)$").expect("valid regex"));

    let (first_line, body) = match content.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (content, ""),
    };

    let caps = H1_RE.captures(first_line)?;
    let title = caps.get(1).map_or("", |m| m.as_str());
    let stem = sanitize_title(title);

    if stem.is_empty() {
        warn!(title, "header title has no usable filename characters; keeping default name");
        return None;
    }

    Some(HeaderName {
        filename: format!("{stem}.md"),
        body: body.to_string(),
    })
}

/// Spaces become dashes, then anything outside `[A-Za-z0-9 .(){}_!?-]` is dropped.
fn sanitize_title(title: &str) -> String {
    title
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || " .(){}_!?-".contains(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_becomes_filename() {
        let name = extract_header_name("# My Guide!\nline two\nline three").unwrap();
        assert_eq!(name.filename, "My-Guide!.md");
        assert_eq!(name.body, "line two\nline three");
    }

    #[test]
    fn disallowed_characters_are_stripped() {
        let name = extract_header_name("# API: v2 / \"Beta\" {draft} (old)?\n").unwrap();
        assert_eq!(name.filename, "API-v2--Beta-{draft}-(old)?.md");
    }

    #[test]
    fn carriage_return_is_stripped() {
        let name = extract_header_name("# Setup\r\nbody").unwrap();
        assert_eq!(name.filename, "Setup.md");
        assert_eq!(name.body, "body");
    }

    #[test]
    fn header_only_document_has_empty_body() {
        let name = extract_header_name("# Lonely").unwrap();
        assert_eq!(name.filename, "Lonely.md");
        assert_eq!(name.body, "");
    }

    #[test]
    fn only_first_line_is_considered() {
        assert!(extract_header_name("intro\n# Later Title\n").is_none());
    }

    #[test]
    fn second_level_header_does_not_match() {
        assert!(extract_header_name("## Sub Title\nbody").is_none());
    }

    #[test]
    fn hash_without_space_does_not_match() {
        assert!(extract_header_name("#hashtag\nbody").is_none());
    }

    #[test]
    fn unusable_title_keeps_default_name() {
        assert!(extract_header_name("# 日本語\nbody").is_none());
    }
}
