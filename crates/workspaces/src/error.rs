//! Error types for workspace operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during workspace operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Workspace root directory not found.
    #[error("Workspace root not found at path: {path}")]
    #[diagnostic(
        code(composer_workspaces::workspace_root_not_found),
        help("Ensure the path points to an existing monorepo root containing a composer.json")
    )]
    WorkspaceNotFound {
        /// The path that was searched.
        path: PathBuf,
    },

    /// The current directory is not one of the discovered workspaces.
    #[error("Could not resolve workspace for path \"{path}\"")]
    #[diagnostic(
        code(composer_workspaces::unresolved_workspace),
        help(
            "Run the command from a workspace directory matched by the root's extra.workspaces globs"
        )
    )]
    UnresolvedWorkspace {
        /// The directory that matched no workspace.
        path: PathBuf,
    },

    /// A member package does not declare where its monorepo root lives.
    #[error("Package at {path} does not declare extra.workspace-root")]
    #[diagnostic(
        code(composer_workspaces::missing_workspace_root),
        help("Add \"extra\": {{\"workspace-root\": \"../..\"}} pointing at the monorepo root")
    )]
    MissingWorkspaceRoot {
        /// Directory of the package whose manifest lacks the pointer.
        path: PathBuf,
    },

    /// Manifest file not found.
    #[error("Manifest file not found at path: {path}")]
    #[diagnostic(
        code(composer_workspaces::manifest_not_found),
        help("Ensure a composer.json exists at the expected location")
    )]
    ManifestNotFound {
        /// The path where the manifest was expected.
        path: PathBuf,
    },

    /// Manifest parsed as JSON but does not have the expected shape.
    #[error("Invalid manifest{}: {message}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(composer_workspaces::invalid_manifest),
        help("Check the composer.json for fields with the wrong type")
    )]
    InvalidManifest {
        /// Path to the invalid manifest, when it came from disk.
        path: Option<PathBuf>,
        /// Description of what is invalid.
        message: String,
    },

    /// A workspace glob could not be compiled.
    #[error("Invalid workspace glob '{pattern}': {source}")]
    #[diagnostic(
        code(composer_workspaces::invalid_glob),
        help("Entries of extra.workspaces must be directory globs such as \"packages/*\"")
    )]
    InvalidGlob {
        /// The offending pattern, joined onto the root directory.
        pattern: String,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// The shared dependency directory at the root does not exist.
    #[error("Shared dependency directory not found at {path}")]
    #[diagnostic(
        code(composer_workspaces::shared_vendor_missing),
        help("Run the install at the workspace root before linking member vendor directories")
    )]
    SharedVendorMissing {
        /// The expected shared directory.
        path: PathBuf,
    },

    /// A freshly created link does not resolve to the shared directory.
    #[error("Link {link} does not resolve to {expected}")]
    #[diagnostic(
        code(composer_workspaces::link_mismatch),
        help("Check for a symlinked parent directory or a filesystem without symlink support")
    )]
    LinkMismatch {
        /// The link that was created.
        link: PathBuf,
        /// The directory it should resolve to.
        expected: PathBuf,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(composer_workspaces::io_error),
        help(
            "Check that the referenced paths exist and that you have permission to read or write them"
        )
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(composer_workspaces::json_error),
        help("Ensure the composer.json has valid JSON syntax")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl Error {
    pub(crate) fn io(
        source: std::io::Error,
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }

    pub(crate) fn invalid_manifest(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}
