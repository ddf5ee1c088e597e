//! Shared types, error model, and configuration for docs2wiki.
//!
//! This crate is the foundation depended on by all other docs2wiki crates.
//! It provides:
//! - [`Docs2WikiError`], the unified error type
//! - Domain types ([`DirectoryStack`], [`OutputIdentity`], [`RepoContext`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, RunConfig, SourceConfig, WikiConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{Docs2WikiError, Result};
pub use types::{
    DirectoryStack, HOME_PAGE_FILENAME, IMAGE_FOLDER, MARKDOWN_EXTENSION, OutputIdentity,
    RepoContext, SIDEBAR_FILENAME, SOURCE_FILE_LINK_PLACEHOLDER, WIKI_PATH_SEPARATOR, wiki_page_id,
};
