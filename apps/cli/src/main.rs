//! docs2wiki CLI: publish a repository's docs tree as a flat wiki.
//!
//! Flattens nested markdown into globally unique page names, rewrites
//! relative links for the wiki, and points everything else back at the
//! repository.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
