//! Error types for docs2wiki.
//!
//! Library crates use [`Docs2WikiError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docs2wiki operations.
#[derive(Debug, thiserror::Error)]
pub enum Docs2WikiError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Two documents claimed the same header-derived wiki filename.
    #[error(
        "filename collision: '{filename}' is claimed by both '{existing}' and '{conflicting}'"
    )]
    FilenameCollision {
        filename: String,
        existing: String,
        conflicting: String,
    },

    /// A relative link walks above the repository's docs root.
    #[error(
        "unresolvable link '{link}' in {file}: it climbs {extra_up_dirs} level(s) above the docs tree, \
         but the docs root is only {root_depth} level(s) deep"
    )]
    UnresolvableLink {
        file: String,
        link: String,
        extra_up_dirs: usize,
        root_depth: usize,
    },

    /// Input validation error (missing source tree, malformed arguments, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Docs2WikiError>;

impl Docs2WikiError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
