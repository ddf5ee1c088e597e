//! Default-name ↔ header-override-name mapping.
//!
//! Filled during the forward pass and read by post-processing, which uses
//! the registration order to substitute default page ids with their
//! override ids across the generated wiki.

use std::collections::HashMap;

use tracing::debug;

use docs2wiki_shared::{Docs2WikiError, Result, wiki_page_id};

/// One registered rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapping {
    /// Flattened filename, e.g. `a__b__guide.md`.
    pub default: String,
    /// Header-derived filename, e.g. `Getting-Started.md`.
    pub override_name: String,
}

impl NameMapping {
    /// Default page id, as written into links by the forward pass.
    pub fn default_page_id(&self) -> String {
        wiki_page_id(&self.default)
    }

    /// Override page id.
    pub fn override_page_id(&self) -> String {
        wiki_page_id(&self.override_name)
    }
}

/// Bidirectional 1:1 map between default and override filenames.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    mappings: Vec<NameMapping>,
    by_override: HashMap<String, usize>,
    by_default: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `default` is published as `override_name`.
    ///
    /// Re-registering an identical pair is a no-op. Claiming an override
    /// already held by another default, or renaming a default twice, is a
    /// [`Docs2WikiError::FilenameCollision`].
    pub fn register(&mut self, default: &str, override_name: &str) -> Result<()> {
        if let Some(&idx) = self.by_override.get(override_name) {
            let existing = &self.mappings[idx];
            if existing.default == default {
                return Ok(());
            }
            return Err(Docs2WikiError::FilenameCollision {
                filename: override_name.to_string(),
                existing: existing.default.clone(),
                conflicting: default.to_string(),
            });
        }

        if let Some(&idx) = self.by_default.get(default) {
            return Err(Docs2WikiError::FilenameCollision {
                filename: default.to_string(),
                existing: self.mappings[idx].override_name.clone(),
                conflicting: override_name.to_string(),
            });
        }

        let idx = self.mappings.len();
        self.mappings.push(NameMapping {
            default: default.to_string(),
            override_name: override_name.to_string(),
        });
        self.by_override.insert(override_name.to_string(), idx);
        self.by_default.insert(default.to_string(), idx);

        debug!(default, override_name, "registered header name");
        Ok(())
    }

    /// Override filename registered for a default filename.
    pub fn override_for(&self, default: &str) -> Option<&str> {
        self.by_default
            .get(default)
            .map(|&idx| self.mappings[idx].override_name.as_str())
    }

    /// Default filename that an override filename replaced.
    pub fn default_for(&self, override_name: &str) -> Option<&str> {
        self.by_override
            .get(override_name)
            .map(|&idx| self.mappings[idx].default.as_str())
    }

    /// Mappings in registration order.
    pub fn mappings(&self) -> &[NameMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_stores_both_directions() {
        let mut registry = NameRegistry::new();
        registry.register("a__guide.md", "Guide.md").unwrap();

        assert_eq!(registry.override_for("a__guide.md"), Some("Guide.md"));
        assert_eq!(registry.default_for("Guide.md"), Some("a__guide.md"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_pair_twice_is_idempotent() {
        let mut registry = NameRegistry::new();
        registry.register("a__guide.md", "Guide.md").unwrap();
        registry.register("a__guide.md", "Guide.md").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn two_defaults_one_override_collides() {
        let mut registry = NameRegistry::new();
        registry.register("a__guide.md", "Guide.md").unwrap();

        let err = registry.register("b__guide.md", "Guide.md").unwrap_err();
        match err {
            Docs2WikiError::FilenameCollision {
                filename,
                existing,
                conflicting,
            } => {
                assert_eq!(filename, "Guide.md");
                assert_eq!(existing, "a__guide.md");
                assert_eq!(conflicting, "b__guide.md");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn renaming_a_default_twice_collides() {
        let mut registry = NameRegistry::new();
        registry.register("a__guide.md", "Guide.md").unwrap();
        assert!(matches!(
            registry.register("a__guide.md", "Other.md"),
            Err(Docs2WikiError::FilenameCollision { .. })
        ));
    }

    #[test]
    fn mappings_keep_registration_order() {
        let mut registry = NameRegistry::new();
        registry.register("z.md", "First.md").unwrap();
        registry.register("a.md", "Second.md").unwrap();

        let ids: Vec<(String, String)> = registry
            .mappings()
            .iter()
            .map(|m| (m.default_page_id(), m.override_page_id()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("z".to_string(), "First".to_string()),
                ("a".to_string(), "Second".to_string())
            ]
        );
    }

    #[test]
    fn page_ids_strip_md_like_link_rewriting() {
        let mut registry = NameRegistry::new();
        registry.register("x.mdn__c.md", "Notes.md").unwrap();

        let mapping = &registry.mappings()[0];
        assert_eq!(mapping.default_page_id(), "xn__c.md");
        assert_eq!(mapping.override_page_id(), "Notes");
    }
}
