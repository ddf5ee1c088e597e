//! Forward pass: walk the docs tree and write a flat wiki.
//!
//! Each directory is handled in three steps, in this order:
//! 1. its own `*.md` files (sorted by name) are rewritten and written flat,
//! 2. its `plantuml-images/` folder, if any, is mirrored recursively,
//! 3. every subdirectory, the image folder included, is visited depth-first
//!    (sorted by name).
//!
//! Mirrored images keep the path of the directory that holds them, so two
//! folders' `flow.svg` never land on the same file.
//!
//! ```text
//! docs/                           wiki/
//! ├── README.md                   ├── Home.md            (home-page conversion)
//! ├── setup.md                    ├── setup.md
//! └── guides/                     ├── guides__intro.md
//!     ├── intro.md                ├── Advanced-Topics.md (header name)
//!     ├── advanced.md             └── plantuml-images/
//!     └── plantuml-images/            └── guides/
//!         └── flow.svg                    └── flow.svg
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use docs2wiki_markdown::{extract_header_name, prepend_header, rewrite_links};
use docs2wiki_shared::{
    DirectoryStack, Docs2WikiError, IMAGE_FOLDER, MARKDOWN_EXTENSION, OutputIdentity,
    RepoContext, Result, SIDEBAR_FILENAME,
};

use crate::pipeline::ProgressReporter;
use crate::registry::NameRegistry;

/// Per-run switches for the forward pass.
#[derive(Debug, Clone, Copy)]
pub struct FlattenOptions<'a> {
    pub repo: &'a RepoContext,
    pub convert_root_readme_to_home_page: bool,
    pub use_header_for_wiki_name: bool,
    /// Attribution header template; `None` disables the header.
    pub custom_header: Option<&'a str>,
}

/// Counts gathered while flattening.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub pages_written: usize,
    pub assets_copied: usize,
}

/// Flatten `source_root` into `dest_root`, registering header overrides.
///
/// Aborts on the first filename collision (two sources, one output page)
/// or unresolvable link; pages already written stay on disk.
#[instrument(skip_all, fields(source = %source_root.display(), dest = %dest_root.display()))]
pub fn flatten(
    source_root: &Path,
    dest_root: &Path,
    options: FlattenOptions<'_>,
    registry: &mut NameRegistry,
    progress: &dyn ProgressReporter,
) -> Result<FlattenStats> {
    let mut flattener = Flattener {
        source_root,
        dest_root,
        options,
        registry,
        progress,
        written: HashMap::new(),
        stats: FlattenStats::default(),
    };
    flattener.visit(&DirectoryStack::root())?;
    Ok(flattener.stats)
}

struct Flattener<'a> {
    source_root: &'a Path,
    dest_root: &'a Path,
    options: FlattenOptions<'a>,
    registry: &'a mut NameRegistry,
    progress: &'a dyn ProgressReporter,
    /// Output filename -> source path that produced it.
    written: HashMap<String, String>,
    stats: FlattenStats,
}

/// A directory entry with a UTF-8 name.
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

impl Flattener<'_> {
    fn visit(&mut self, stack: &DirectoryStack) -> Result<()> {
        let dir = stack.to_path(self.source_root);
        let entries = read_sorted_entries(&dir)?;

        debug!(dir = %stack, entries = entries.len(), "visiting directory");

        for entry in entries.iter().filter(|e| !e.is_dir && is_markdown(&e.name)) {
            self.write_document(stack, &entry.name, &entry.path)?;
        }

        if let Some(images) = entries.iter().find(|e| e.is_dir && e.name == IMAGE_FOLDER) {
            self.mirror_assets(stack, &images.path)?;
        }

        for entry in entries.iter().filter(|e| e.is_dir) {
            self.visit(&stack.child(entry.name.as_str()))?;
        }

        Ok(())
    }

    fn write_document(&mut self, stack: &DirectoryStack, filename: &str, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path).map_err(|e| Docs2WikiError::io(path, e))?;
        let rewritten = rewrite_links(&raw, stack, filename, self.options.repo)?;
        let (identity, body) = self.choose_identity(stack, filename, rewritten)?;

        let content = match self.options.custom_header {
            Some(template) if filename != SIDEBAR_FILENAME => {
                let link = self.options.repo.source_file_link(stack, filename);
                prepend_header(template, &link, &body)
            }
            _ => body,
        };

        let output_name = identity.filename().to_string();
        let source = stack.relative_path(filename);
        if let Some(existing) = self.written.get(&output_name) {
            return Err(Docs2WikiError::FilenameCollision {
                filename: output_name,
                existing: existing.clone(),
                conflicting: source,
            });
        }

        let target = self.dest_root.join(&output_name);
        fs::write(&target, content).map_err(|e| Docs2WikiError::io(&target, e))?;

        self.stats.pages_written += 1;
        self.progress
            .page_written(&output_name, self.stats.pages_written);
        debug!(source = %source, page = %output_name, "wrote page");
        self.written.insert(output_name, source);
        Ok(())
    }

    /// Decide the output name; returns the content to emit under it.
    fn choose_identity(
        &mut self,
        stack: &DirectoryStack,
        filename: &str,
        content: String,
    ) -> Result<(OutputIdentity, String)> {
        let default = stack.flattened_name(filename);

        if self.options.convert_root_readme_to_home_page
            && stack.is_empty()
            && filename.eq_ignore_ascii_case("readme.md")
        {
            return Ok((OutputIdentity::Home, content));
        }

        if self.options.use_header_for_wiki_name {
            if let Some(header) = extract_header_name(&content) {
                self.registry.register(&default, &header.filename)?;
                return Ok((
                    OutputIdentity::Override {
                        default,
                        name: header.filename,
                    },
                    header.body,
                ));
            }
        }

        Ok((OutputIdentity::Default(default), content))
    }

    /// Copy every file under the image folder of the directory at `stack`
    /// to `<dest>/plantuml-images/<stack>/`, keeping its path relative to
    /// that folder.
    fn mirror_assets(&mut self, stack: &DirectoryStack, image_dir: &Path) -> Result<()> {
        let target_root = stack.to_path(&self.dest_root.join(IMAGE_FOLDER));

        for entry in WalkDir::new(image_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(image_dir, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(image_dir).map_err(|_| {
                Docs2WikiError::validation(format!(
                    "{} is not inside {}",
                    entry.path().display(),
                    image_dir.display()
                ))
            })?;
            let target = target_root.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Docs2WikiError::io(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Docs2WikiError::io(entry.path(), e))?;

            self.stats.assets_copied += 1;
            debug!(asset = %relative.display(), "mirrored asset");
        }

        Ok(())
    }
}

fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}

/// Directory entries sorted by name. Non-UTF-8 names are skipped.
fn read_sorted_entries(dir: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| Docs2WikiError::io(dir, e))? {
        let entry = entry.map_err(|e| Docs2WikiError::io(dir, e))?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = %path.display(), "skipping entry with non UTF-8 name");
            continue;
        };
        entries.push(Entry {
            is_dir: path.is_dir(),
            name,
            path,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Convert a `walkdir` failure into the shared error type.
pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> Docs2WikiError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(source) => Docs2WikiError::io(path, source),
        None => Docs2WikiError::validation(format!("filesystem loop at {}", path.display())),
    }
}
