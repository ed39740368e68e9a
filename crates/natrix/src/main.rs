//! Natrix - Entry Point
//!
//! | Command | Description |
//! |---------|-------------|
//! | `natrix lint [PATHS..]` | Report mutability issues |
//! | `natrix codegen exports FILE` | Print an explicit `exports:` declaration |
//! | `natrix codegen call-graph FILE` | Print a Mermaid call graph |
//! | `natrix rules` | List rules |
//!
//! Exit codes: `0` clean, `1` issues reported or command failed, `2` usage
//! or configuration error.

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use natrix_lint::{ConfigLoader, NatrixConfig};
use std::process::ExitCode;
use tracing::error;

const USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("natrix: {err:#}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let result = match cli.command {
        Command::Lint(args) => commands::lint(args, config),
        Command::Codegen(command) => commands::codegen(command, &config),
        Command::Rules => Ok(commands::rules()),
    };

    result.unwrap_or_else(|err| {
        error!(error = %err, "Command failed");
        eprintln!("natrix: {err:#}");
        ExitCode::FAILURE
    })
}

fn load_config(cli: &Cli) -> Result<NatrixConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging, cli.verbose)?;
    Ok(config)
}
