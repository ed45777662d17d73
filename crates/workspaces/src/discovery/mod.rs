//! Workspace discovery under a monorepo root.
//!
//! A root declares directory globs in `extra.workspaces`:
//!
//! ```json
//! {
//!     "name": "acme/monorepo",
//!     "extra": { "workspaces": ["packages/*", "tools/cli"] }
//! }
//! ```
//!
//! Every directory matched by a glob that directly contains a `composer.json`
//! becomes a [`Workspace`], keyed by its declared name. Matched directories are
//! not searched recursively.
//!
//! # Usage
//!
//! ```rust,ignore
//! use composer_workspaces::{TracingIo, WorkspaceRoot};
//! use std::path::Path;
//!
//! let mut root = WorkspaceRoot::new(Path::new("."))?.with_globs(&["packages/*".into()]);
//! root.scan_workspaces(&TracingIo)?;
//!
//! for workspace in root.workspaces() {
//!     println!("{} at {}", workspace.name(), workspace.relative_path().display());
//! }
//! ```

pub mod registry;

pub use registry::WorkspaceRootRegistry;

use crate::core::traits::Io;
use crate::core::types::Workspace;
use crate::error::{Error, Result};
use crate::manifest::{MANIFEST_FILE_NAME, Manifest};
use crate::materializer::VENDOR_DIR_NAME;
use crate::path;
use glob::Pattern;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The monorepo root and the workspaces found beneath it.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    path: PathBuf,
    globs: Vec<String>,
    workspaces: IndexMap<String, Workspace>,
}

impl WorkspaceRoot {
    /// Creates an empty root for `path`, which is canonicalized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkspaceNotFound`] if `path` does not exist.
    pub fn new(path: &Path) -> Result<Self> {
        let path = path.canonicalize().map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Cannot canonicalize workspace root");
            Error::WorkspaceNotFound {
                path: path.to_path_buf(),
            }
        })?;

        Ok(Self {
            path,
            globs: Vec::new(),
            workspaces: IndexMap::new(),
        })
    }

    /// Sets the directory globs, each joined onto the root directory.
    #[must_use]
    pub fn with_globs(mut self, globs: &[String]) -> Self {
        self.set_globs(globs);
        self
    }

    /// Replaces the directory globs, each joined onto the root directory.
    pub fn set_globs(&mut self, globs: &[String]) {
        let base = Pattern::escape(&path::to_slash(&self.path));
        self.globs = globs
            .iter()
            .map(|glob| {
                let glob = glob.trim_start_matches("./").trim_end_matches('/');
                format!("{}/{glob}", base.trim_end_matches('/'))
            })
            .collect();
    }

    /// The absolute globs used for discovery.
    #[must_use]
    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    /// Finds every workspace matched by the globs.
    ///
    /// Members whose manifest cannot be loaded or has no `name` are reported
    /// through `io` and skipped. When two members declare the same name the
    /// one scanned later replaces the earlier one, with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error only if a glob is not a valid pattern.
    pub fn scan_workspaces(&mut self, io: &dyn Io) -> Result<()> {
        for directory in resolve_glob_patterns(&self.globs)? {
            if !directory.join(MANIFEST_FILE_NAME).is_file() {
                tracing::trace!(directory = %directory.display(), "No manifest, not a workspace");
                continue;
            }

            match Workspace::from_directory(&directory, &self.path) {
                Ok(workspace) if !workspace.absolute_path().starts_with(&self.path) => {
                    tracing::warn!(
                        directory = %directory.display(),
                        root = %self.path.display(),
                        "Skipping workspace outside the root"
                    );
                    io.write_error(&format!(
                        "Skipped {}: outside the workspace root {}",
                        directory.display(),
                        self.path.display()
                    ));
                }
                Ok(workspace) => {
                    tracing::debug!(
                        name = workspace.name(),
                        path = %workspace.relative_path().display(),
                        "Discovered workspace"
                    );
                    let name = workspace.name().to_string();
                    if let Some(previous) = self.workspaces.insert(name.clone(), workspace) {
                        tracing::warn!(
                            name = %name,
                            replaced = %previous.absolute_path().display(),
                            by = %directory.display(),
                            "Duplicate workspace name"
                        );
                        io.write_error(&format!(
                            "Workspace name '{name}' is declared by both {} and {}, using the latter",
                            previous.absolute_path().display(),
                            directory.display()
                        ));
                    }
                }
                Err(error) => {
                    tracing::warn!(directory = %directory.display(), %error, "Skipping workspace");
                    io.write_error(&format!(
                        "Skipped {}: could not load package. {error}",
                        directory.display()
                    ));
                }
            }
        }

        Ok(())
    }

    /// The canonical root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks a workspace up by its declared name.
    #[must_use]
    pub fn workspace_by_name(&self, name: &str) -> Option<&Workspace> {
        self.workspaces.get(name)
    }

    /// Whether a workspace with this name was discovered.
    #[must_use]
    pub fn has_workspace(&self, name: &str) -> bool {
        self.workspaces.contains_key(name)
    }

    /// Discovered workspaces in discovery order.
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.values()
    }

    /// Declared names of all discovered workspaces.
    pub fn workspace_names(&self) -> impl Iterator<Item = &str> {
        self.workspaces.keys().map(String::as_str)
    }

    /// Number of discovered workspaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    /// Whether no workspace was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Returns the workspace whose directory is exactly `path`.
    ///
    /// Subdirectories of a workspace do not resolve to it.
    #[must_use]
    pub fn resolve_workspace(&self, path: &Path) -> Option<&Workspace> {
        let path = path::normalize(path);
        self.workspaces
            .values()
            .find(|workspace| workspace.absolute_path() == path)
    }

    /// How the root directory is reached from `path`, with forward slashes.
    #[must_use]
    pub fn path_relative_to(&self, path: &Path) -> String {
        path::to_slash(&path::relative_to(&self.path, path))
    }

    /// Location of the root `composer.json`.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE_NAME)
    }

    /// The shared dependency-installation directory.
    #[must_use]
    pub fn vendor_directory(&self) -> PathBuf {
        self.path.join(VENDOR_DIR_NAME)
    }

    /// Reads the root `composer.json` as it is on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or malformed.
    pub fn read_manifest(&self) -> Result<Manifest> {
        Manifest::from_path(&self.manifest_path())
    }

    /// Replaces the root `composer.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        manifest.write_to(&self.manifest_path())
    }
}

/// Expands absolute directory globs into the directories they match.
///
/// Directories come out sorted within each glob and globs are expanded in the
/// order given; a directory matched by several globs is listed once, at its
/// first match. Files and unreadable entries are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidGlob`] if a pattern does not compile.
pub fn resolve_glob_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut directories = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|source| Error::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in entries {
            match entry {
                Ok(candidate) if candidate.is_dir() => {
                    let candidate = path::normalize(&candidate);
                    if seen.insert(candidate.clone()) {
                        directories.push(candidate);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(pattern = %pattern, error = %e, "Unreadable glob match");
                }
            }
        }
    }

    Ok(directories)
}
