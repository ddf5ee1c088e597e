//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docs2wiki_core::commit::render_commit_message;
use docs2wiki_core::pipeline::{ConvertConfig, ConvertResult, ProgressReporter};
use docs2wiki_shared::{AppConfig, RunConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docs2wiki: publish a docs tree as a flat wiki.
#[derive(Parser)]
#[command(
    name = "docs2wiki",
    version,
    about = "Flatten a repository's markdown docs into a wiki with working links.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.docs2wiki/docs2wiki.toml).
    #[arg(long, env = "DOCS2WIKI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Regenerate the wiki directory from the docs tree.
    Convert(ConvertArgs),

    /// Render the commit message for publishing the wiki.
    CommitMessage {
        /// Source commit message.
        #[arg(long, env = "DOCS2WIKI_COMMIT_MESSAGE")]
        message: String,

        /// Source commit sha.
        #[arg(long, env = "DOCS2WIKI_SHA")]
        sha: String,

        /// Template with {commitMessage}, {shaFull}, {shaShort}.
        #[arg(long, env = "DOCS2WIKI_CUSTOM_COMMIT_MESSAGE")]
        template: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `convert`; each overrides the config file.
#[derive(clap::Args)]
pub(crate) struct ConvertArgs {
    /// Source repository checkout.
    #[arg(long, default_value = ".", env = "DOCS2WIKI_REPO_DIR")]
    pub repo: PathBuf,

    /// Wiki checkout to regenerate (everything but .git is removed).
    #[arg(long, env = "DOCS2WIKI_WIKI_DIR")]
    pub wiki: PathBuf,

    /// Docs root relative to the repository root.
    #[arg(long, env = "DOCS2WIKI_DOCS_ROOT")]
    pub docs_root: Option<String>,

    /// Branch used in links back to the repository.
    #[arg(long, env = "DOCS2WIKI_DEFAULT_BRANCH")]
    pub branch: Option<String>,

    /// Repository web URL.
    #[arg(long, env = "DOCS2WIKI_REPO_URL")]
    pub repo_url: Option<String>,

    /// Publish the root README.md as Home.md.
    #[arg(long, env = "DOCS2WIKI_HOME_PAGE")]
    pub home_page: bool,

    /// Name pages after their leading `# Header` line.
    #[arg(long, env = "DOCS2WIKI_HEADER_NAMES")]
    pub header_names: bool,

    /// Header prepended to every page; may contain {sourceFileLink}.
    #[arg(long, env = "DOCS2WIKI_CUSTOM_HEADER")]
    pub custom_header: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// stays usable for `commit-message`.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docs2wiki=info",
        1 => "docs2wiki=debug",
        _ => "docs2wiki=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Convert(args) => cmd_convert(config_path, args),
        Command::CommitMessage {
            message,
            sha,
            template,
        } => cmd_commit_message(config_path, &message, &sha, template),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(&path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn cmd_convert(config_path: Option<PathBuf>, args: ConvertArgs) -> Result<()> {
    let app = resolve_config(config_path)?;
    let mut run = RunConfig::from(&app);

    if let Some(docs_root) = args.docs_root {
        run.docs_root = docs_root;
    }
    if let Some(branch) = args.branch {
        run.default_branch = branch;
    }
    if let Some(repo_url) = args.repo_url {
        run.repo_url = repo_url;
    }
    if args.custom_header.is_some() {
        run.custom_header = args.custom_header;
    }
    run.convert_root_readme_to_home_page |= args.home_page;
    run.use_header_for_wiki_name |= args.header_names;

    if !args.repo.is_dir() {
        return Err(eyre!(
            "repository checkout '{}' is not a directory",
            args.repo.display()
        ));
    }

    let config = ConvertConfig {
        repo_dir: args.repo,
        wiki_dir: args.wiki,
        run,
    };

    info!(
        repo = %config.repo_dir.display(),
        wiki = %config.wiki_dir.display(),
        docs_root = %config.run.docs_root,
        "converting docs to wiki"
    );

    let reporter = CliProgress::new();
    let result = docs2wiki_core::pipeline::convert(&config, &reporter)?;

    println!();
    println!("  Wiki generated successfully!");
    println!("  Pages:    {}", result.pages_written);
    println!("  Renamed:  {}", result.overrides);
    println!("  Relinked: {}", result.files_post_processed);
    println!("  Images:   {}", result.assets_copied);
    println!("  Path:     {}", config.wiki_dir.display());
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_commit_message(
    config_path: Option<PathBuf>,
    message: &str,
    sha: &str,
    template: Option<String>,
) -> Result<()> {
    let template = match template {
        Some(template) => Some(template),
        None => resolve_config(config_path)?.wiki.custom_commit_message,
    };
    println!("{}", render_commit_message(template.as_deref(), message, sha));
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_written(&self, page: &str, current: usize) {
        self.spinner
            .set_message(format!("Writing [{current}] {page}"));
    }

    fn done(&self, _result: &ConvertResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Clears the spinner when the run aborts before `done`.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
