//! layerbind CLI
//!
//! Inspect how configuration resolves from a directory: the merged override
//! store, single field resolution, the bound snapshot, error behaviors, and
//! the files that took part.

mod cli;
mod commands;
mod error;
mod shape;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    execute_command(cli.command)
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`); `--verbose`
/// forces debug.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    if verbose {
        tracing::debug!("Verbose mode enabled");
    }
    Ok(())
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Overrides { json, target } => commands::run_overrides(&target, json),
        Commands::Resolve {
            key,
            shape,
            alias,
            performance_value,
            target,
        } => commands::run_resolve(
            &target,
            &key,
            &shape,
            alias.as_deref(),
            performance_value.as_deref(),
        ),
        Commands::Snapshot { fields, target } => commands::run_snapshot(&target, &fields),
        Commands::Errors { json, target } => commands::run_errors(&target, json),
        Commands::Paths { target } => commands::run_paths(&target),
    }
}
