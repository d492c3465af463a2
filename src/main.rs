//! Slugtree command-line entry point.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use slugtree::cli::{self, Cli, Commands};
use slugtree::config::{SlugConfig, find_config_file};
use slugtree::{debug, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = load_config(&cli.config)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async {
        match &cli.command {
            Commands::Resolve { target } => cli::resolve::resolve_entry(target, config).await,
            Commands::Edit { target, args } => cli::edit::edit_entry(target, args, config).await,
        }
    })
}

/// Find the config file upward from the current directory, defaults when absent.
fn load_config(name: &Path) -> Result<SlugConfig> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    match find_config_file(&cwd, name) {
        Some(path) => {
            debug!("config"; "using {}", path.display());
            SlugConfig::load(&path)
        }
        None => {
            debug!("config"; "{} not found, using defaults", name.display());
            Ok(SlugConfig::default())
        }
    }
}
