//! CLI-specific errors rendered through miette

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Workspace(#[from] composer_workspaces::Error),

    #[error("Could not read the merged root package from {}", describe(.path))]
    #[diagnostic(
        code(composer_workspaces::cli::merged_unreadable),
        help("Pass the merged composer.json with --merged <file>, or --merged - to read stdin")
    )]
    ReadMerged {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}", path.display())]
    #[diagnostic(
        code(composer_workspaces::cli::output_unwritable),
        help("Check that the parent directory exists and is writable")
    )]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize command output")]
    #[diagnostic(code(composer_workspaces::cli::serialize))]
    Serialize(#[from] serde_json::Error),
}

fn describe(path: &std::path::Path) -> String {
    if path.as_os_str() == "-" {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_merged_names_stdin() {
        let error = CliError::ReadMerged {
            path: PathBuf::from("-"),
            source: std::io::Error::other("closed"),
        };
        assert_eq!(
            error.to_string(),
            "Could not read the merged root package from stdin"
        );
    }

    #[test]
    fn test_workspace_errors_keep_their_code() {
        let error: CliError = composer_workspaces::Error::UnresolvedWorkspace {
            path: PathBuf::from("/repo/tools/stray"),
        }
        .into();

        assert_eq!(
            error.code().map(|code| code.to_string()).as_deref(),
            Some("composer_workspaces::unresolved_workspace")
        );
        assert!(error.to_string().contains("/repo/tools/stray"));
    }
}
