//! End-to-end `convert` pipeline: clear wiki → flatten docs → fix renamed links.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument};

use docs2wiki_shared::{Docs2WikiError, RepoContext, Result, RunConfig};

use crate::flatten::{self, FlattenOptions};
use crate::postprocess;
use crate::registry::NameRegistry;

/// Entry of the wiki checkout that survives clearing.
const GIT_DIR: &str = ".git";

/// Configuration for the `convert` pipeline.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Local checkout of the source repository.
    pub repo_dir: PathBuf,
    /// Local checkout of the wiki; fully regenerated.
    pub wiki_dir: PathBuf,
    /// Link and naming settings.
    pub run: RunConfig,
}

impl ConvertConfig {
    /// Docs root on disk: `repo_dir` joined with the configured docs root.
    pub fn source_dir(&self) -> PathBuf {
        RepoContext::parse_docs_root(&self.run.docs_root)
            .iter()
            .fold(self.repo_dir.clone(), |acc, s| acc.join(s))
    }
}

/// Result of the `convert` pipeline.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Markdown pages written to the wiki.
    pub pages_written: usize,
    /// Image files mirrored into the wiki.
    pub assets_copied: usize,
    /// Pages published under a header-derived name.
    pub overrides: usize,
    /// Pages touched by the renamed-link pass.
    pub files_post_processed: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is written.
    fn page_written(&self, page: &str, current: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_written(&self, _page: &str, _current: usize) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Run the full conversion.
///
/// 1. Validate settings and the source tree
/// 2. Clear the wiki directory (keeping `.git`)
/// 3. Flatten the docs tree into the wiki
/// 4. Rewrite links to header-renamed pages
///
/// Any error stops the run before anything is published; files already
/// written to the wiki directory are left as they are.
#[instrument(skip_all, fields(repo = %config.repo_dir.display(), wiki = %config.wiki_dir.display()))]
pub fn convert(config: &ConvertConfig, progress: &dyn ProgressReporter) -> Result<ConvertResult> {
    let start = Instant::now();
    config.run.validate()?;

    let source_dir = config.source_dir();
    if !source_dir.is_dir() {
        return Err(Docs2WikiError::validation(format!(
            "docs directory {} does not exist",
            source_dir.display()
        )));
    }

    info!(source = %source_dir.display(), "starting conversion");

    // --- Phase 1: Clear ---
    progress.phase("Clearing wiki directory");
    fs::create_dir_all(&config.wiki_dir).map_err(|e| Docs2WikiError::io(&config.wiki_dir, e))?;
    ensure_disjoint(&source_dir, &config.wiki_dir)?;
    clear_wiki_dir(&config.wiki_dir)?;

    // --- Phase 2: Flatten ---
    progress.phase("Flattening docs");
    let repo = config.run.repo_context();
    let options = FlattenOptions {
        repo: &repo,
        convert_root_readme_to_home_page: config.run.convert_root_readme_to_home_page,
        use_header_for_wiki_name: config.run.use_header_for_wiki_name,
        custom_header: config.run.custom_header.as_deref(),
    };
    let mut registry = NameRegistry::new();
    let stats = flatten::flatten(&source_dir, &config.wiki_dir, options, &mut registry, progress)?;

    info!(
        pages = stats.pages_written,
        assets = stats.assets_copied,
        overrides = registry.len(),
        "docs flattened"
    );

    // --- Phase 3: Post-process ---
    progress.phase("Updating links to renamed pages");
    let files_post_processed = postprocess::post_process(&config.wiki_dir, &registry)?;

    let result = ConvertResult {
        pages_written: stats.pages_written,
        assets_copied: stats.assets_copied,
        overrides: registry.len(),
        files_post_processed,
        elapsed: start.elapsed(),
    };

    info!(
        pages = result.pages_written,
        post_processed = result.files_post_processed,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "conversion complete"
    );

    progress.done(&result);
    Ok(result)
}

/// Refuse to clear a wiki directory that holds (or is) the docs tree.
fn ensure_disjoint(source_dir: &Path, wiki_dir: &Path) -> Result<()> {
    let source = fs::canonicalize(source_dir).map_err(|e| Docs2WikiError::io(source_dir, e))?;
    let wiki = fs::canonicalize(wiki_dir).map_err(|e| Docs2WikiError::io(wiki_dir, e))?;

    if source.starts_with(&wiki) {
        return Err(Docs2WikiError::validation(format!(
            "wiki directory {} contains the docs directory {}; refusing to clear it",
            wiki.display(),
            source.display()
        )));
    }
    Ok(())
}

/// Remove everything in the wiki directory except `.git`.
fn clear_wiki_dir(wiki_dir: &Path) -> Result<()> {
    for entry in fs::read_dir(wiki_dir).map_err(|e| Docs2WikiError::io(wiki_dir, e))? {
        let entry = entry.map_err(|e| Docs2WikiError::io(wiki_dir, e))?;
        if entry.file_name() == GIT_DIR {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Docs2WikiError::io(&path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| Docs2WikiError::io(&path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| Docs2WikiError::io(&path, e))?;
        }
        debug!(path = %path.display(), "removed stale wiki entry");
    }
    Ok(())
}
