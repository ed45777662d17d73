//! Per-invocation cache of workspace roots.

use super::WorkspaceRoot;
use crate::core::traits::Io;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Maps canonical root directories to their scanned [`WorkspaceRoot`].
///
/// One registry is created per invocation and passed to whatever needs a
/// root, so each root directory is scanned at most once per run. Entries are
/// never invalidated.
#[derive(Debug, Default)]
pub struct WorkspaceRootRegistry {
    roots: HashMap<PathBuf, Rc<WorkspaceRoot>>,
}

impl WorkspaceRootRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scanned root for `path`, scanning it on first request.
    ///
    /// On a cache hit `manifest` is ignored and the instance from the first
    /// request is returned. On a miss the globs come from `manifest` when one
    /// is given (the caller is the root package) and from the root's own
    /// `composer.json` on disk otherwise (the caller is a member).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist, its manifest cannot
    /// be read, it declares no `extra.workspaces`, or a glob is invalid.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn create_workspace_root(
        &mut self,
        path: &Path,
        manifest: Option<&Manifest>,
        io: &dyn Io,
    ) -> Result<Rc<WorkspaceRoot>> {
        let root = WorkspaceRoot::new(path)?;
        if let Some(cached) = self.roots.get(root.path()) {
            tracing::trace!("Reusing scanned workspace root");
            return Ok(Rc::clone(cached));
        }

        let on_disk;
        let manifest = match manifest {
            Some(manifest) => manifest,
            None => {
                on_disk = root.read_manifest()?;
                &on_disk
            }
        };

        let globs = manifest.workspace_globs()?.ok_or_else(|| {
            Error::invalid_manifest(
                Some(root.manifest_path()),
                "a workspace root must declare extra.workspaces",
            )
        })?;

        let mut root = root.with_globs(&globs);
        root.scan_workspaces(io)?;
        tracing::debug!(workspaces = root.len(), "Scanned workspace root");

        let root = Rc::new(root);
        self.roots
            .insert(root.path().to_path_buf(), Rc::clone(&root));
        Ok(root)
    }

    /// Returns an already scanned root without scanning.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Rc<WorkspaceRoot>> {
        let path = path.canonicalize().ok()?;
        self.roots.get(&path).cloned()
    }

    /// Number of cached roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether nothing has been scanned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::io::MemoryIo;
    use std::fs;
    use tempfile::TempDir;

    fn monorepo() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join("composer.json"),
            r#"{"name": "acme/monorepo", "extra": {"workspaces": ["packages/*"]}}"#,
        )
        .unwrap();
        for (dir, name) in [("packages/a", "pkg-a"), ("packages/b", "pkg-b")] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(
                root.join(dir).join("composer.json"),
                format!(r#"{{"name": "{name}", "extra": {{"workspace-root": "../.."}}}}"#),
            )
            .unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_second_request_returns_same_instance() {
        let temp_dir = monorepo();
        let io = MemoryIo::new();
        let mut registry = WorkspaceRootRegistry::new();

        let first = registry
            .create_workspace_root(temp_dir.path(), None, &io)
            .unwrap();
        let second = registry
            .create_workspace_root(&temp_dir.path().join("packages/.."), None, &io)
            .unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            first.workspace_names().collect::<Vec<_>>(),
            second.workspace_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_cache_hit_ignores_manifest() {
        let temp_dir = monorepo();
        let io = MemoryIo::new();
        let mut registry = WorkspaceRootRegistry::new();

        let first = registry
            .create_workspace_root(temp_dir.path(), None, &io)
            .unwrap();

        let other: Manifest = r#"{"extra": {"workspaces": ["elsewhere/*"]}}"#.parse().unwrap();
        let second = registry
            .create_workspace_root(temp_dir.path(), Some(&other), &io)
            .unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_given_manifest_supplies_globs() {
        let temp_dir = monorepo();
        let io = MemoryIo::new();
        let mut registry = WorkspaceRootRegistry::new();

        let manifest: Manifest = r#"{"extra": {"workspaces": ["packages/a"]}}"#.parse().unwrap();
        let root = registry
            .create_workspace_root(temp_dir.path(), Some(&manifest), &io)
            .unwrap();

        assert_eq!(root.workspace_names().collect::<Vec<_>>(), ["pkg-a"]);
        assert!(registry.get(temp_dir.path()).is_some());
    }

    #[test]
    fn test_root_without_workspaces_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("composer.json"), r#"{"name": "acme/solo"}"#).unwrap();

        let mut registry = WorkspaceRootRegistry::new();
        let result = registry.create_workspace_root(temp_dir.path(), None, &MemoryIo::new());

        assert!(matches!(result, Err(Error::InvalidManifest { .. })));
        assert!(registry.is_empty());
    }
}
