//! Link resolution for the flattened wiki namespace.
//!
//! Relative links written against the source tree are reinterpreted against
//! the flat wiki: links to markdown inside the docs tree become `__`-joined
//! page ids, everything else that leaves the tree becomes an absolute
//! repository URL.
//!
//! `..` is counted wherever it appears in the link, not only as a leading
//! run: `a/../b.md` climbs one level and keeps `a` in the path. `.` is an
//! ordinary segment, so `./c.md` from `a` becomes `a__.__c`. Existing wikis
//! depend on both, so they are kept as is.
//!
//! Non-markdown links that do not climb above the current directory resolve
//! against the docs root itself rather than the current directory: from
//! `a/b`, both `../x.png` and `x.png` become `<docs root>/x.png`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use docs2wiki_shared::{
    DirectoryStack, Docs2WikiError, RepoContext, Result, WIKI_PATH_SEPARATOR, wiki_page_id,
};

/// A link climbs above the repository's docs root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("link climbs {extra_up_dirs} level(s) above the docs tree, which is {root_depth} level(s) deep")]
pub struct EscapedRoot {
    pub extra_up_dirs: usize,
    pub root_depth: usize,
}

/// `[text](target)` on a single line. Nested brackets are not supported.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]\n]*)\]\(([^)\n]+)\)").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Single link
// ---------------------------------------------------------------------------

/// Resolve one link target as seen from a document at `stack`.
///
/// Returns the rewritten target: unchanged for absolute and anchor links,
/// a wiki page id for markdown inside the docs tree, or an absolute
/// `blob` URL otherwise.
pub fn resolve_link(
    stack: &DirectoryStack,
    link: &str,
    repo: &RepoContext,
) -> std::result::Result<String, EscapedRoot> {
    if is_passthrough(link) {
        return Ok(link.to_string());
    }

    let (up_dirs, path) = split_link(link);

    if up_dirs <= stack.len() && is_markdown_link(link) {
        let kept = &stack.segments()[..stack.len() - up_dirs];
        let joined = kept
            .iter()
            .map(String::as_str)
            .chain(path.iter().copied())
            .collect::<Vec<_>>()
            .join(WIKI_PATH_SEPARATOR);
        return Ok(wiki_page_id(&joined));
    }

    // Only climbs beyond the current directory eat into the docs root. A
    // link that stays inside the stack keeps the whole docs root and loses
    // the stack, so `../x.png` from `a/b` points at `<docs root>/x.png`.
    let extra_up_dirs = up_dirs.saturating_sub(stack.len());
    let root_depth = repo.root_depth();
    if extra_up_dirs > root_depth {
        return Err(EscapedRoot {
            extra_up_dirs,
            root_depth,
        });
    }

    let segments: Vec<&str> = repo.docs_root[..root_depth - extra_up_dirs]
        .iter()
        .map(String::as_str)
        .chain(path)
        .collect();
    Ok(repo.blob_url(&segments))
}

/// Absolute (`http*`, `onenote*`) and anchor-only links are left alone.
fn is_passthrough(link: &str) -> bool {
    link.starts_with("http") || link.starts_with("onenote") || link.starts_with('#')
}

/// True when the part before any `#fragment` names a markdown file.
fn is_markdown_link(link: &str) -> bool {
    link.split('#')
        .next()
        .is_some_and(|target| target.ends_with(".md"))
}

/// Count every `..` segment and collect the rest, `.` included, in order.
fn split_link(link: &str) -> (usize, Vec<&str>) {
    let mut up_dirs = 0;
    let mut path = Vec::new();
    for segment in link.split('/') {
        if segment == ".." {
            up_dirs += 1;
        } else {
            path.push(segment);
        }
    }
    (up_dirs, path)
}

// ---------------------------------------------------------------------------
// Whole document
// ---------------------------------------------------------------------------

/// Rewrite every `[text](target)` in `content` for a document named
/// `filename` at `stack`. Text outside link targets is copied verbatim.
pub fn rewrite_links(
    content: &str,
    stack: &DirectoryStack,
    filename: &str,
    repo: &RepoContext,
) -> Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for caps in LINK_RE.captures_iter(content) {
        let (Some(whole), Some(target)) = (caps.get(0), caps.get(2)) else {
            continue;
        };

        let resolved = resolve_link(stack, target.as_str(), repo).map_err(|e| {
            Docs2WikiError::UnresolvableLink {
                file: stack.relative_path(filename),
                link: target.as_str().to_string(),
                extra_up_dirs: e.extra_up_dirs,
                root_depth: e.root_depth,
            }
        })?;

        trace!(from = target.as_str(), to = %resolved, "rewrote link");

        out.push_str(&content[last..target.start()]);
        out.push_str(&resolved);
        out.push_str(&content[target.end()..whole.end()]);
        last = whole.end();
    }

    out.push_str(&content[last..]);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "https://github.com/org/repo";

    fn repo(docs_root: &str) -> RepoContext {
        RepoContext::new(REPO, "main", docs_root)
    }

    fn stack(segments: &[&str]) -> DirectoryStack {
        segments.iter().copied().collect()
    }

    #[test]
    fn absolute_and_anchor_links_untouched() {
        let ctx = repo("docs");
        let s = stack(&["a", "b"]);
        for link in [
            "https://example.com/x.md",
            "http://example.com",
            "onenote:///notebook",
            "#section-1",
            "httpfoo/../../../../x.md",
        ] {
            assert_eq!(resolve_link(&s, link, &ctx).unwrap(), link);
        }
    }

    #[test]
    fn sibling_up_link_flattens() {
        let resolved = resolve_link(&stack(&["a", "b"]), "../c.md", &repo("docs")).unwrap();
        assert_eq!(resolved, "a__c");
    }

    #[test]
    fn nested_link_flattens_with_stack_prefix() {
        let resolved = resolve_link(&stack(&["a"]), "b/c.md", &repo("docs")).unwrap();
        assert_eq!(resolved, "a__b__c");
        assert!(!resolved.contains('/'));
    }

    #[test]
    fn dot_segments_stay_in_the_page_id() {
        let resolved = resolve_link(&stack(&["a"]), "./c.md", &repo("docs")).unwrap();
        assert_eq!(resolved, "a__.__c");
    }

    #[test]
    fn anchor_kept_on_internal_link() {
        let resolved = resolve_link(&stack(&[]), "guide.md#install", &repo("docs")).unwrap();
        assert_eq!(resolved, "guide#install");
    }

    #[test]
    fn only_first_md_occurrence_is_removed() {
        // Substring removal, not suffix-anchored.
        let resolved = resolve_link(&stack(&["x.mdn"]), "c.md", &repo("docs")).unwrap();
        assert_eq!(resolved, "xn__c.md");
    }

    #[test]
    fn inner_dot_dot_counts_as_up_move() {
        let resolved = resolve_link(&stack(&["a", "b"]), "x/../y.md", &repo("docs")).unwrap();
        assert_eq!(resolved, "a__x__y");
    }

    #[test]
    fn escaping_markdown_link_becomes_repo_url() {
        let resolved = resolve_link(&stack(&["a"]), "../../src/README.md", &repo("docs")).unwrap();
        assert_eq!(resolved, format!("{REPO}/blob/main/src/README.md"));
    }

    #[test]
    fn escaping_link_keeps_partial_root_path() {
        let resolved =
            resolve_link(&stack(&[]), "../other/file.md#top", &repo("docs/wiki")).unwrap();
        assert_eq!(resolved, format!("{REPO}/blob/main/docs/other/file.md#top"));
    }

    #[test]
    fn non_markdown_link_inside_root_resolves_against_docs_root() {
        let ctx = repo("docs");
        let s = stack(&["a", "b"]);
        assert_eq!(
            resolve_link(&s, "../x.png", &ctx).unwrap(),
            format!("{REPO}/blob/main/docs/x.png")
        );
        assert_eq!(
            resolve_link(&s, "plantuml-images/seq.png", &ctx).unwrap(),
            format!("{REPO}/blob/main/docs/plantuml-images/seq.png")
        );
    }

    #[test]
    fn non_markdown_link_with_dot_segment_keeps_it() {
        let resolved = resolve_link(&stack(&["a"]), "./x.png", &repo("docs")).unwrap();
        assert_eq!(resolved, format!("{REPO}/blob/main/docs/./x.png"));
    }

    #[test]
    fn non_markdown_escape_uses_partial_root() {
        let resolved =
            resolve_link(&stack(&["a"]), "../../img/logo.svg", &repo("docs/wiki")).unwrap();
        assert_eq!(resolved, format!("{REPO}/blob/main/docs/img/logo.svg"));
    }

    #[test]
    fn link_above_repository_fails() {
        let err = resolve_link(&stack(&[]), "../../x/y.md", &repo("docs")).unwrap_err();
        assert_eq!(
            err,
            EscapedRoot {
                extra_up_dirs: 2,
                root_depth: 1
            }
        );
    }

    #[test]
    fn link_to_repository_root_is_allowed() {
        let resolved = resolve_link(&stack(&["a"]), "../../LICENSE", &repo("docs")).unwrap();
        assert_eq!(resolved, format!("{REPO}/blob/main/LICENSE"));
    }

    #[test]
    fn rewrite_links_replaces_every_occurrence() {
        let input = "See [one](../c.md) and [two](d.md).\nAlso [web](https://x.y) [top](#top)\n";
        let out = rewrite_links(input, &stack(&["a", "b"]), "page.md", &repo("docs")).unwrap();
        assert_eq!(
            out,
            "See [one](a__c) and [two](a__b__d).\nAlso [web](https://x.y) [top](#top)\n"
        );
    }

    #[test]
    fn rewrite_links_without_matches_is_identity() {
        let input = "# Title\n\nNo links here, only (parens) and [brackets].\n";
        let out = rewrite_links(input, &stack(&["a"]), "page.md", &repo("docs")).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn absolute_and_anchor_only_document_round_trips() {
        let input = "[a](https://example.com/a.md)\r\n[b](#b) [c](onenote:x)\n\n";
        let out = rewrite_links(input, &stack(&["deep", "er"]), "p.md", &repo("docs")).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn rewrite_links_rewrites_image_targets() {
        let input = "![diagram](plantuml-images/flow.svg)";
        let out = rewrite_links(input, &stack(&["a"]), "p.md", &repo("docs")).unwrap();
        assert_eq!(
            out,
            format!("![diagram]({REPO}/blob/main/docs/plantuml-images/flow.svg)")
        );
    }

    #[test]
    fn rewrite_links_reports_offending_file() {
        let err = rewrite_links("[x](../../../y.md)", &stack(&["a"]), "p.md", &repo("docs"))
            .unwrap_err();
        match err {
            Docs2WikiError::UnresolvableLink {
                file,
                link,
                extra_up_dirs,
                root_depth,
            } => {
                assert_eq!(file, "a/p.md");
                assert_eq!(link, "../../../y.md");
                assert_eq!(extra_up_dirs, 2);
                assert_eq!(root_depth, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
