//! Second pass: point links at header-renamed pages.
//!
//! Links were written against default page ids during the forward pass. Once
//! every rename is known, each default id is replaced by its override id in
//! every generated page. The replacement is a bare text substitution, so a
//! default id that also appears in prose (or as the prefix of a longer id)
//! is rewritten too.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};
use walkdir::WalkDir;

use docs2wiki_shared::{Docs2WikiError, MARKDOWN_EXTENSION, Result};

use crate::flatten::walk_error;
use crate::registry::NameRegistry;

/// Apply every registered rename to the `.md` files under `wiki_root`.
///
/// Returns how many files changed. `.git` is never entered.
#[instrument(skip_all, fields(wiki = %wiki_root.display(), mappings = registry.len()))]
pub fn post_process(wiki_root: &Path, registry: &NameRegistry) -> Result<usize> {
    if registry.is_empty() {
        return Ok(0);
    }

    let mut changed = 0;
    let walker = WalkDir::new(wiki_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(wiki_root, e))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != MARKDOWN_EXTENSION)
        {
            continue;
        }

        let original = fs::read_to_string(path).map_err(|e| Docs2WikiError::io(path, e))?;
        let updated = substitute_names(&original, registry);
        if updated != original {
            fs::write(path, updated).map_err(|e| Docs2WikiError::io(path, e))?;
            changed += 1;
            debug!(page = %path.display(), "updated renamed links");
        }
    }

    Ok(changed)
}

/// Replace each default page id with its override id, in registration order.
pub fn substitute_names(content: &str, registry: &NameRegistry) -> String {
    registry
        .mappings()
        .iter()
        .fold(content.to_string(), |text, mapping| {
            text.replace(&mapping.default_page_id(), &mapping.override_page_id())
        })
}
