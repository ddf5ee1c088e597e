//! Core domain types shared by the markdown and core crates.

use std::fmt;
use std::path::{Path, PathBuf};

/// Separator used to flatten directory segments into a single wiki page name.
pub const WIKI_PATH_SEPARATOR: &str = "__";

/// Markdown file extension (without the dot).
pub const MARKDOWN_EXTENSION: &str = "md";

/// Output filename forced for the root readme when home-page conversion is on.
pub const HOME_PAGE_FILENAME: &str = "Home.md";

/// Sidebar page; never receives the generated attribution header.
pub const SIDEBAR_FILENAME: &str = "_sidebar.md";

/// Image folder mirrored into the wiki. Used for both source and destination.
pub const IMAGE_FOLDER: &str = "plantuml-images";

/// Placeholder substituted in the custom header template.
pub const SOURCE_FILE_LINK_PLACEHOLDER: &str = "{sourceFileLink}";

/// Wiki page id for a flattened filename or link path: the first `.md`
/// occurrence is removed, wherever it sits (`x.mdn__c.md` -> `xn__c.md`).
///
/// Link rewriting and rename substitution both go through this so that a
/// renamed page's default id matches the links written to it.
pub fn wiki_page_id(name: &str) -> String {
    name.replacen(".md", "", 1)
}

// ---------------------------------------------------------------------------
// DirectoryStack
// ---------------------------------------------------------------------------

/// Path segments from the docs root down to the directory being processed.
///
/// Never mutated in place: descending produces an extended copy via
/// [`DirectoryStack::child`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryStack(Vec<String>);

impl DirectoryStack {
    /// The stack for the docs root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new stack one level deeper.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Filesystem location of this stack below `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.iter().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }

    /// Default flattened wiki filename for `filename` at this position,
    /// e.g. `a__b__guide.md`.
    pub fn flattened_name(&self, filename: &str) -> String {
        let mut parts: Vec<&str> = self.0.iter().map(String::as_str).collect();
        parts.push(filename);
        parts.join(WIKI_PATH_SEPARATOR)
    }

    /// Slash-separated path of `filename` relative to the docs root.
    pub fn relative_path(&self, filename: &str) -> String {
        let mut parts: Vec<&str> = self.0.iter().map(String::as_str).collect();
        parts.push(filename);
        parts.join("/")
    }
}

impl<S: Into<String>> FromIterator<S> for DirectoryStack {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for DirectoryStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("/"))
        }
    }
}

// ---------------------------------------------------------------------------
// OutputIdentity
// ---------------------------------------------------------------------------

/// Final wiki filename chosen for a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputIdentity {
    /// Flattened `segment__segment__name.md`.
    Default(String),
    /// Header-derived name that replaced the flattened `default`.
    Override { default: String, name: String },
    /// Root readme promoted to the wiki home page.
    Home,
}

impl OutputIdentity {
    pub fn filename(&self) -> &str {
        match self {
            Self::Default(name) => name,
            Self::Override { name, .. } => name,
            Self::Home => HOME_PAGE_FILENAME,
        }
    }
}

// ---------------------------------------------------------------------------
// RepoContext
// ---------------------------------------------------------------------------

/// Where the docs live in the source repository; used to build absolute
/// links for anything that cannot stay inside the wiki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// Repository web URL without trailing slash.
    pub repo_url: String,
    /// Branch used in `blob` URLs.
    pub default_branch: String,
    /// Docs root segments relative to the repository root.
    pub docs_root: Vec<String>,
}

impl RepoContext {
    pub fn new(repo_url: &str, default_branch: &str, docs_root: &str) -> Self {
        Self {
            repo_url: repo_url.trim_end_matches('/').to_string(),
            default_branch: default_branch.to_string(),
            docs_root: Self::parse_docs_root(docs_root),
        }
    }

    /// Normalize a docs root like `./docs/wiki/` into `["docs", "wiki"]`.
    pub fn parse_docs_root(docs_root: &str) -> Vec<String> {
        docs_root
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect()
    }

    /// How many directories the docs root sits below the repository root.
    pub fn root_depth(&self) -> usize {
        self.docs_root.len()
    }

    /// `<repo_url>/blob/<branch>/<segments joined by '/'>`.
    pub fn blob_url<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let path = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/blob/{}/{path}", self.repo_url, self.default_branch)
    }

    /// Absolute repository URL of a source document, used for
    /// the `{sourceFileLink}` placeholder.
    pub fn source_file_link(&self, stack: &DirectoryStack, filename: &str) -> String {
        let mut segments: Vec<&str> = self.docs_root.iter().map(String::as_str).collect();
        segments.extend(stack.segments().iter().map(String::as_str));
        segments.push(filename);
        self.blob_url(&segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RepoContext {
        RepoContext::new("https://github.com/org/repo/", "main", "./docs/wiki/")
    }

    #[test]
    fn child_extends_copy() {
        let root = DirectoryStack::root();
        let a = root.child("a");
        let ab = a.child("b");
        assert!(root.is_empty());
        assert_eq!(a.segments(), ["a"]);
        assert_eq!(ab.segments(), ["a", "b"]);
    }

    #[test]
    fn flattened_name_joins_with_double_underscore() {
        let stack: DirectoryStack = ["a", "b"].into_iter().collect();
        assert_eq!(stack.flattened_name("guide.md"), "a__b__guide.md");
        assert_eq!(DirectoryStack::root().flattened_name("x.md"), "x.md");
    }

    #[test]
    fn docs_root_is_normalized() {
        assert_eq!(ctx().docs_root, vec!["docs", "wiki"]);
        assert_eq!(ctx().root_depth(), 2);
        assert!(RepoContext::parse_docs_root(".").is_empty());
        assert!(RepoContext::parse_docs_root("").is_empty());
    }

    #[test]
    fn blob_url_trims_trailing_slash() {
        assert_eq!(
            ctx().blob_url(&["src", "lib.rs"]),
            "https://github.com/org/repo/blob/main/src/lib.rs"
        );
    }

    #[test]
    fn source_file_link_includes_docs_root_and_stack() {
        let stack: DirectoryStack = ["guides"].into_iter().collect();
        assert_eq!(
            ctx().source_file_link(&stack, "setup.md"),
            "https://github.com/org/repo/blob/main/docs/wiki/guides/setup.md"
        );
    }

    #[test]
    fn page_id_drops_first_md_occurrence() {
        assert_eq!(wiki_page_id("a__guide.md"), "a__guide");
        assert_eq!(wiki_page_id("guide.md#install"), "guide#install");
        assert_eq!(wiki_page_id("x.mdn__c.md"), "xn__c.md");
        assert_eq!(wiki_page_id("Home"), "Home");
    }

    #[test]
    fn output_identity_filenames() {
        assert_eq!(OutputIdentity::Default("a__b.md".into()).filename(), "a__b.md");
        assert_eq!(
            OutputIdentity::Override {
                default: "a__b.md".into(),
                name: "Guide.md".into()
            }
            .filename(),
            "Guide.md"
        );
        assert_eq!(OutputIdentity::Home.filename(), "Home.md");
    }
}
