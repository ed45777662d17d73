//! Host binary for the Composer workspaces hooks.
//!
//! `activate` runs before dependency resolution and prints the repository
//! list with sibling path repositories prepended. `post-install` runs at the
//! root after an install, with the merged root package as input.

mod cli;
mod commands;
mod errors;
mod io;
mod tracing;

use crate::cli::Cli;
use crate::tracing::TracingConfig;
use clap::Parser;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
        ..TracingConfig::default()
    })?;

    commands::execute(cli)?;
    Ok(())
}
