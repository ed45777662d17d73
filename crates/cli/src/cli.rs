use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "composer-workspaces")]
#[command(about = "Runs the Composer monorepo workspace hooks for a package directory")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "COMPOSER_WORKSPACES_CWD",
        help = "Package directory to run in",
        default_value = "."
    )]
    pub cwd: PathBuf,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, global = true, help = "Log format", value_enum)]
    pub format: Option<TracingFormat>,

    #[arg(long, global = true, help = "Print results and logs as JSON")]
    pub json: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Show version information")]
    Version,
    #[command(about = "Register sibling workspaces as path repositories before resolution")]
    Activate {
        #[arg(
            long,
            short = 'o',
            help = "Write the resulting repository list to a file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    #[command(
        name = "post-install",
        about = "Reconcile the root manifest and link member vendor directories"
    )]
    PostInstall {
        #[arg(
            long,
            short = 'm',
            help = "Merged root package as JSON, or - to read it from stdin"
        )]
        merged: PathBuf,
    },
}

impl Cli {
    /// Log format to use: `--format` if given, JSON with `--json`, otherwise compact.
    pub fn tracing_format(&self) -> TracingFormat {
        match (self.format, self.json) {
            (Some(format), _) => format,
            (None, true) => TracingFormat::Json,
            (None, false) => TracingFormat::Compact,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["composer-workspaces", "version"]).unwrap();

        assert_eq!(cli.level, LogLevel::Warn);
        assert_eq!(cli.format, None);
        assert!(!cli.json);
        assert_eq!(cli.command, Commands::Version);
        assert_eq!(cli.tracing_format(), TracingFormat::Compact);
    }

    #[test]
    fn test_cli_log_level_parsing() {
        let cli = Cli::try_parse_from(["composer-workspaces", "--level", "trace", "version"]).unwrap();
        assert_eq!(cli.level, LogLevel::Trace);

        let cli = Cli::try_parse_from(["composer-workspaces", "-l", "debug", "version"]).unwrap();
        assert_eq!(cli.level, LogLevel::Debug);

        let cli = Cli::try_parse_from(["composer-workspaces", "version", "-l", "error"]).unwrap();
        assert_eq!(cli.level, LogLevel::Error);
    }

    #[test]
    fn test_invalid_log_level() {
        let result = Cli::try_parse_from(["composer-workspaces", "--level", "loud", "version"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_format_parsing() {
        let cli = Cli::try_parse_from(["composer-workspaces", "--format", "pretty", "version"]).unwrap();
        assert_eq!(cli.format, Some(TracingFormat::Pretty));

        let result = Cli::try_parse_from(["composer-workspaces", "--format", "xml", "version"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_selects_json_logs_unless_format_given() {
        let cli = Cli::try_parse_from(["composer-workspaces", "--json", "version"]).unwrap();
        assert_eq!(cli.tracing_format(), TracingFormat::Json);

        let cli = Cli::try_parse_from(["composer-workspaces", "--json", "--format", "dev", "version"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.tracing_format(), TracingFormat::Dev);
    }

    #[test]
    fn test_activate_command() {
        let cli = Cli::try_parse_from(["composer-workspaces", "activate"]).unwrap();
        assert_eq!(cli.command, Commands::Activate { output: None });

        let cli = Cli::try_parse_from([
            "composer-workspaces",
            "--cwd",
            "packages/b",
            "activate",
            "-o",
            "repos.json",
        ])
        .unwrap();
        assert_eq!(cli.cwd, Path::new("packages/b"));
        assert_eq!(
            cli.command,
            Commands::Activate {
                output: Some(PathBuf::from("repos.json"))
            }
        );
    }

    #[test]
    fn test_post_install_requires_merged() {
        let result = Cli::try_parse_from(["composer-workspaces", "post-install"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["composer-workspaces", "post-install", "--merged", "-"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::PostInstall {
                merged: PathBuf::from("-")
            }
        );
    }

    #[test]
    fn test_missing_subcommand() {
        let result = Cli::try_parse_from(["composer-workspaces"]);
        assert!(result.is_err());
    }
}
