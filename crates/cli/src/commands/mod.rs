pub mod activate;
pub mod post_install;
pub mod version;

use crate::cli::{Cli, Commands};
use crate::errors::CliError;
use std::fs;
use std::path::{Path, PathBuf};

/// What every command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub cwd: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            cwd: cli.cwd.clone(),
            json: cli.json,
        }
    }
}

#[tracing::instrument(skip_all, fields(command = ?cli.command))]
pub fn execute(cli: Cli) -> Result<(), CliError> {
    let context = Context::from_cli(&cli);
    match cli.command {
        Commands::Version => version::execute(&context),
        Commands::Activate { output } => activate::execute(&context, output.as_deref()),
        Commands::PostInstall { merged } => post_install::execute(&context, &merged),
    }
}

/// Writes `text` to `output`, or to stdout when none is given.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, format!("{text}\n")).map_err(|source| {
            CliError::WriteOutput {
                path: path.to_path_buf(),
                source,
            }
        }),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
