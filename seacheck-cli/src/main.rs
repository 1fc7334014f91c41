//! Binary crate for the `seacheck` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Terminal rendering of markers, the location list and comparisons

use clap::Parser;
use seacheck_core::Config;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let config = Config::load()?;

    init_tracing(cmd.verbose, &config.log_level);

    cmd.run(config).await
}

/// `RUST_LOG` wins over `--verbose`, which wins over the configured level.
fn init_tracing(verbose: bool, configured: &str) {
    let fallback = if verbose { "debug" } else { configured };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
