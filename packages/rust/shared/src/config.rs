//! Application configuration for docs2wiki.
//!
//! User config lives at `~/.docs2wiki/docs2wiki.toml` unless `--config`
//! points elsewhere. CLI flags (and their `DOCS2WIKI_*` environment
//! variables) override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Docs2WikiError, Result};
use crate::types::{RepoContext, SOURCE_FILE_LINK_PLACEHOLDER};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docs2wiki.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docs2wiki";

// ---------------------------------------------------------------------------
// Config structs (matching docs2wiki.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the docs come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// How the wiki is shaped.
    #[serde(default)]
    pub wiki: WikiConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Docs root, relative to the repository root.
    #[serde(default = "default_docs_root")]
    pub docs_root: String,

    /// Branch used when building links back to the repository.
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Repository web URL, e.g. `https://github.com/org/repo`.
    #[serde(default)]
    pub repo_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            default_branch: default_branch(),
            repo_url: String::new(),
        }
    }
}

fn default_docs_root() -> String {
    "docs".into()
}
fn default_branch() -> String {
    "main".into()
}

/// `[wiki]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Emit the root `README.md` as `Home.md`.
    #[serde(default)]
    pub convert_root_readme_to_home_page: bool,

    /// Name pages after their leading `# Header` line.
    #[serde(default)]
    pub use_header_for_wiki_name: bool,

    /// Header line prepended to every page; may contain `{sourceFileLink}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_header: Option<String>,

    /// Commit message template with `{commitMessage}`, `{shaFull}`, `{shaShort}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_commit_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime conversion settings, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Docs root relative to the repository root.
    pub docs_root: String,
    pub default_branch: String,
    pub repo_url: String,
    pub convert_root_readme_to_home_page: bool,
    pub use_header_for_wiki_name: bool,
    pub custom_header: Option<String>,
    pub custom_commit_message: Option<String>,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            docs_root: config.source.docs_root.clone(),
            default_branch: config.source.default_branch.clone(),
            repo_url: config.source.repo_url.clone(),
            convert_root_readme_to_home_page: config.wiki.convert_root_readme_to_home_page,
            use_header_for_wiki_name: config.wiki.use_header_for_wiki_name,
            custom_header: config.wiki.custom_header.clone(),
            custom_commit_message: config.wiki.custom_commit_message.clone(),
        }
    }
}

impl RunConfig {
    /// Check that the settings can produce resolvable links.
    pub fn validate(&self) -> Result<()> {
        if self.repo_url.trim().is_empty() {
            return Err(Docs2WikiError::config(
                "repo_url is not set. Pass --repo-url or set [source].repo_url",
            ));
        }
        Url::parse(&self.repo_url).map_err(|e| {
            Docs2WikiError::config(format!("repo_url '{}' is not a valid URL: {e}", self.repo_url))
        })?;

        if self.default_branch.trim().is_empty() {
            return Err(Docs2WikiError::config("default_branch must not be empty"));
        }

        if RepoContext::parse_docs_root(&self.docs_root)
            .iter()
            .any(|s| s == "..")
        {
            return Err(Docs2WikiError::config(format!(
                "docs_root '{}' must stay inside the repository",
                self.docs_root
            )));
        }

        if let Some(header) = &self.custom_header {
            if !header.contains(SOURCE_FILE_LINK_PLACEHOLDER) {
                tracing::warn!(
                    header = %header,
                    "custom header has no {SOURCE_FILE_LINK_PLACEHOLDER} placeholder"
                );
            }
        }

        Ok(())
    }

    /// Repository addressing derived from these settings.
    pub fn repo_context(&self) -> RepoContext {
        RepoContext::new(&self.repo_url, &self.default_branch, &self.docs_root)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docs2wiki/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Docs2WikiError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docs2wiki/docs2wiki.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Docs2WikiError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        Docs2WikiError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| Docs2WikiError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| Docs2WikiError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| Docs2WikiError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
