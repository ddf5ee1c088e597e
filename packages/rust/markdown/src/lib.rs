//! Line-oriented markdown rewriting for flat wikis.
//!
//! Documents are treated as text, not parsed: the only syntax recognized is
//! `[text](target)` links and a leading `# Header` line. Every function here
//! is a pure `&str -> String` transform; file I/O lives in `docs2wiki-core`.

mod header;
mod links;

pub use header::{HeaderName, extract_header_name};
pub use links::{EscapedRoot, resolve_link, rewrite_links};

use docs2wiki_shared::SOURCE_FILE_LINK_PLACEHOLDER;

/// Prepend the attribution header: the template line with `{sourceFileLink}`
/// filled in, then two blank lines, then the document.
pub fn prepend_header(template: &str, source_file_link: &str, content: &str) -> String {
    let header = template.replace(SOURCE_FILE_LINK_PLACEHOLDER, source_file_link);
    format!("{header}\n\n\n{content}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs2wiki_shared::{DirectoryStack, RepoContext};

    #[test]
    fn header_placeholder_is_filled() {
        let out = prepend_header(
            "> Edit this page at {sourceFileLink}",
            "https://github.com/org/repo/blob/main/docs/a.md",
            "# A\n",
        );
        assert_eq!(
            out,
            "> Edit this page at https://github.com/org/repo/blob/main/docs/a.md\n\n\n# A\n"
        );
    }

    #[test]
    fn header_without_placeholder_is_used_verbatim() {
        let out = prepend_header("Generated page", "ignored", "body");
        assert_eq!(out, "Generated page\n\n\nbody");
    }

    #[test]
    fn rewrite_then_header_keeps_header_link_absolute() {
        let repo = RepoContext::new("https://github.com/org/repo", "main", "docs");
        let stack: DirectoryStack = ["guides"].into_iter().collect();
        let body = rewrite_links("[next](next.md)\n", &stack, "intro.md", &repo).unwrap();
        let page = prepend_header(
            "[source]({sourceFileLink})",
            &repo.source_file_link(&stack, "intro.md"),
            &body,
        );
        assert_eq!(
            page,
            "[source](https://github.com/org/repo/blob/main/docs/guides/intro.md)\n\n\n[next](guides__next)\n"
        );
    }
}
