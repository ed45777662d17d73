//! Core types for representing workspaces and repositories.

use crate::core::traits::RepositoryManager;
use crate::error::{Error, Result};
use crate::manifest::{MANIFEST_FILE_NAME, Manifest};
use crate::materializer::VENDOR_DIR_NAME;
use crate::path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Repository type used for local sibling packages.
pub const PATH_REPOSITORY_TYPE: &str = "path";

/// A package discovered under a workspace root.
///
/// Workspaces are created by [`crate::WorkspaceRoot::scan_workspaces`] and are
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    name: String,
    absolute_path: PathBuf,
    relative_path: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Creates a workspace from an already parsed manifest.
    ///
    /// `relative_path` is computed from `root`; both paths should already be
    /// canonical.
    #[must_use]
    pub fn new(name: impl Into<String>, absolute_path: &Path, root: &Path, manifest: Manifest) -> Self {
        let absolute_path = path::normalize(absolute_path);
        let relative_path = path::relative_to(&absolute_path, root);
        Self {
            name: name.into(),
            absolute_path,
            relative_path,
            manifest,
        }
    }

    /// Loads the workspace whose `composer.json` sits directly in `directory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed, or if it
    /// does not declare a non-empty `name`.
    pub fn from_directory(directory: &Path, root: &Path) -> Result<Self> {
        let manifest_path = directory.join(MANIFEST_FILE_NAME);
        let manifest = Manifest::from_path(&manifest_path)?;

        let name = match manifest.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(Error::invalid_manifest(
                    Some(manifest_path),
                    "No 'name' field found",
                ));
            }
        };

        Ok(Self::new(name, directory, root, manifest))
    }

    /// Declared package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute directory of the package.
    #[must_use]
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Directory of the package relative to its workspace root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// The parsed `composer.json`.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Location of the package's `composer.json`.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.absolute_path.join(MANIFEST_FILE_NAME)
    }

    /// Location of the package's own dependency-installation directory.
    #[must_use]
    pub fn vendor_directory(&self) -> PathBuf {
        self.absolute_path.join(VENDOR_DIR_NAME)
    }

    /// How this package's directory is reached from `base`, with forward
    /// slashes.
    #[must_use]
    pub fn path_relative_to(&self, base: &Path) -> String {
        path::to_slash(&path::relative_to(&self.absolute_path, base))
    }
}

/// Where a member package says its monorepo root lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    workspace_root_directory: PathBuf,
}

impl WorkspaceConfig {
    /// Wraps an already resolved root directory.
    #[must_use]
    pub fn new(workspace_root_directory: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root_directory: workspace_root_directory.into(),
        }
    }

    /// Reads `extra.workspace-root` and resolves it against `package_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWorkspaceRoot`] if the pointer is absent or not
    /// a string.
    pub fn from_manifest(manifest: &Manifest, package_dir: &Path) -> Result<Self> {
        let pointer = manifest
            .workspace_root_pointer()
            .ok_or_else(|| Error::MissingWorkspaceRoot {
                path: package_dir.to_path_buf(),
            })?;

        Ok(Self::new(path::normalize(&package_dir.join(pointer))))
    }

    /// The resolved root directory.
    #[must_use]
    pub fn workspace_root_directory(&self) -> &Path {
        &self.workspace_root_directory
    }
}

/// A repository entry as found in `composer.json` or handed to the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository type (`path`, `composer`, `vcs`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Location of the repository, when the type has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Any further type-specific settings, kept verbatim.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Repository {
    /// A `path` repository pointing at `url`.
    #[must_use]
    pub fn path(url: impl Into<String>) -> Self {
        Self {
            kind: PATH_REPOSITORY_TYPE.to_string(),
            url: Some(url.into()),
            options: Map::new(),
        }
    }

    /// Whether this is a local `path` repository.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.kind == PATH_REPOSITORY_TYPE
    }
}

/// In-memory [`RepositoryManager`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RepositoryList {
    repositories: Vec<Repository>,
}

impl RepositoryList {
    /// Starts from the repositories a manifest declares, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest's `repositories` entry is malformed.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        Ok(Self {
            repositories: manifest.repositories()?,
        })
    }

    /// Number of registered repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether no repository is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_inner(self) -> Vec<Repository> {
        self.repositories
    }
}

impl RepositoryManager for RepositoryList {
    fn create_repository(&self, kind: &str, mut config: Map<String, Value>) -> Result<Repository> {
        config.insert("type".to_string(), Value::String(kind.to_string()));
        serde_json::from_value(Value::Object(config)).map_err(Error::from)
    }

    fn prepend_repository(&mut self, repository: Repository) {
        self.repositories.insert(0, repository);
    }

    fn add_repository(&mut self, repository: Repository) {
        self.repositories.push(repository);
    }

    fn repositories(&self) -> &[Repository] {
        &self.repositories
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_relative_path() {
        let workspace = Workspace::new(
            "pkg-a",
            Path::new("/repo/packages/a"),
            Path::new("/repo"),
            Manifest::default(),
        );

        assert_eq!(workspace.name(), "pkg-a");
        assert_eq!(workspace.relative_path(), Path::new("packages/a"));
        assert_eq!(workspace.vendor_directory(), PathBuf::from("/repo/packages/a/vendor"));
        assert_eq!(workspace.path_relative_to(Path::new("/repo/packages/b")), "../a");
    }

    #[test]
    fn test_workspace_from_directory_requires_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("composer.json"),
            r#"{"require": {"php": "^8.1"}}"#,
        )
        .unwrap();

        let error = Workspace::from_directory(temp_dir.path(), temp_dir.path()).unwrap_err();
        assert!(error.to_string().contains("No 'name' field found"));
    }

    #[test]
    fn test_workspace_config_resolves_pointer() {
        let manifest = Manifest::from_value(json!({
            "name": "acme/a",
            "extra": {"workspace-root": "../.."}
        }))
        .unwrap();

        let config = WorkspaceConfig::from_manifest(&manifest, Path::new("/repo/packages/a")).unwrap();
        assert_eq!(config.workspace_root_directory(), Path::new("/repo"));
    }

    #[test]
    fn test_workspace_config_missing_pointer() {
        let manifest = Manifest::from_value(json!({"name": "acme/a"})).unwrap();

        let error = WorkspaceConfig::from_manifest(&manifest, Path::new("/repo/packages/a"));
        assert!(matches!(error, Err(Error::MissingWorkspaceRoot { .. })));
    }

    #[test]
    fn test_repository_list_prepend_and_add() {
        let mut list = RepositoryList::default();
        list.add_repository(Repository {
            kind: "composer".to_string(),
            url: Some("https://repo.packagist.org".to_string()),
            options: Map::new(),
        });

        let mut config = Map::new();
        config.insert("url".to_string(), json!("../a"));
        let path = list.create_repository("path", config).unwrap();
        list.prepend_repository(path);

        assert_eq!(list.len(), 2);
        assert!(list.repositories()[0].is_path());
        assert_eq!(list.repositories()[0].url.as_deref(), Some("../a"));
        assert_eq!(list.repositories()[1].kind, "composer");
    }

    #[test]
    fn test_repository_keeps_extra_options() {
        let repository: Repository = serde_json::from_value(json!({
            "type": "path",
            "url": "../shared",
            "options": {"symlink": true}
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&repository).unwrap(),
            json!({"type": "path", "url": "../shared", "options": {"symlink": true}})
        );
    }
}
