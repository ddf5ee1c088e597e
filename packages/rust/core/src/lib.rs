//! Conversion pipeline for docs2wiki.
//!
//! Ties the markdown transforms to the filesystem: a forward pass flattens
//! the docs tree into the wiki directory while collecting header renames,
//! and a second pass retargets links at the renamed pages.

pub mod commit;
pub mod flatten;
pub mod pipeline;
pub mod postprocess;
pub mod registry;
