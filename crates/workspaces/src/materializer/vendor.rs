//! Links every workspace's `vendor` directory to the root's.

use super::remove_path;
use crate::core::types::Workspace;
use crate::discovery::WorkspaceRoot;
use crate::error::{Error, Result};
use crate::path;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::symlink;
#[cfg(windows)]
use std::os::windows::fs::symlink_dir as symlink;

const ALIAS_NAME: &str = ".vendor.link";
const BACKUP_NAME: &str = ".vendor.old";

/// What happened to one workspace's `vendor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The directory was replaced by a link to the shared one.
    Linked,
    /// It already was such a link; nothing was touched.
    AlreadyLinked,
    /// The workspace's `vendor` is the shared directory itself.
    Skipped,
}

/// Replaces each member's `vendor` with a symlink to the root's `vendor`.
///
/// A member's previous `vendor` is only deleted once the link is in place
/// and resolves to the shared directory. A failure part way leaves the
/// member with either its old directory or the new link.
pub struct DependencyDirectoryLinker<'a> {
    root: &'a WorkspaceRoot,
}

impl<'a> DependencyDirectoryLinker<'a> {
    /// Creates a linker for a scanned root.
    #[must_use]
    pub const fn new(root: &'a WorkspaceRoot) -> Self {
        Self { root }
    }

    /// Links every discovered workspace, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SharedVendorMissing`] before touching any workspace if
    /// the root has no `vendor` directory, and the first I/O failure otherwise.
    #[tracing::instrument(skip_all, fields(root = %self.root.path().display()))]
    pub fn link_all(&self) -> Result<Vec<(String, LinkOutcome)>> {
        self.shared_directory()?;

        let mut outcomes = Vec::with_capacity(self.root.len());
        for workspace in self.root.workspaces() {
            let outcome = self.link_workspace(workspace)?;
            outcomes.push((workspace.name().to_string(), outcome));
        }

        let linked = outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == LinkOutcome::Linked)
            .count();
        tracing::info!(linked, total = outcomes.len(), "Linked workspace vendor directories");
        Ok(outcomes)
    }

    /// Links a single workspace's `vendor` to the shared directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SharedVendorMissing`] if the root has no `vendor`,
    /// [`Error::LinkMismatch`] if the new link resolves elsewhere, and
    /// [`Error::Io`] for filesystem failures.
    pub fn link_workspace(&self, workspace: &Workspace) -> Result<LinkOutcome> {
        let shared = self.root.vendor_directory();
        let resolved_shared = self.shared_directory()?;
        let vendor = workspace.vendor_directory();

        if path::normalize(&vendor) == shared {
            tracing::debug!(name = workspace.name(), "Workspace vendor is the shared directory");
            return Ok(LinkOutcome::Skipped);
        }
        if links_to(&vendor, &resolved_shared) {
            tracing::debug!(name = workspace.name(), "Vendor already linked");
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let directory = workspace.absolute_path();
        let alias = directory.join(ALIAS_NAME);
        let backup = directory.join(BACKUP_NAME);

        for leftover in [&alias, &backup] {
            remove_path(leftover)
                .map_err(|e| Error::io(e, leftover.as_path(), "removing stale link staging path"))?;
        }

        symlink(&shared, &alias).map_err(|e| Error::io(e, &alias, "creating vendor link"))?;

        if !links_to(&alias, &resolved_shared) {
            discard(&alias);
            return Err(Error::LinkMismatch {
                link: alias,
                expected: resolved_shared,
            });
        }

        let had_vendor = fs::symlink_metadata(&vendor).is_ok();
        if had_vendor
            && let Err(e) = fs::rename(&vendor, &backup)
        {
            discard(&alias);
            return Err(Error::io(e, &vendor, "moving vendor directory aside"));
        }

        if let Err(e) = fs::rename(&alias, &vendor) {
            if had_vendor
                && let Err(restore) = fs::rename(&backup, &vendor)
            {
                tracing::error!(
                    backup = %backup.display(),
                    error = %restore,
                    "Could not restore vendor directory"
                );
            }
            discard(&alias);
            return Err(Error::io(e, &vendor, "moving vendor link into place"));
        }

        if let Err(e) = remove_path(&backup) {
            tracing::warn!(path = %backup.display(), error = %e, "Could not delete previous vendor directory");
        }

        tracing::debug!(
            name = workspace.name(),
            vendor = %vendor.display(),
            target = %shared.display(),
            "Linked vendor directory"
        );
        Ok(LinkOutcome::Linked)
    }

    fn shared_directory(&self) -> Result<PathBuf> {
        let shared = self.root.vendor_directory();
        match shared.canonicalize() {
            Ok(resolved) if resolved.is_dir() => Ok(resolved),
            _ => Err(Error::SharedVendorMissing { path: shared }),
        }
    }
}

/// Whether `link` is a symlink resolving to `target`.
fn links_to(link: &Path, target: &Path) -> bool {
    let is_symlink = fs::symlink_metadata(link).is_ok_and(|m| m.file_type().is_symlink());
    is_symlink && link.canonicalize().is_ok_and(|resolved| resolved == target)
}

fn discard(path: &Path) {
    if let Err(e) = remove_path(path) {
        tracing::warn!(path = %path.display(), error = %e, "Could not remove vendor link");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::io::MemoryIo;
    use tempfile::TempDir;

    fn monorepo() -> (TempDir, WorkspaceRoot) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for (dir, name) in [("packages/a", "pkg-a"), ("packages/b", "pkg-b")] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(
                root.join(dir).join("composer.json"),
                format!(r#"{{"name": "{name}"}}"#),
            )
            .unwrap();
        }
        fs::create_dir_all(root.join("vendor/lib/x")).unwrap();
        fs::write(root.join("vendor/autoload.php"), "<?php // shared").unwrap();

        let mut workspace_root = WorkspaceRoot::new(root)
            .unwrap()
            .with_globs(&["packages/*".to_string()]);
        workspace_root.scan_workspaces(&MemoryIo::new()).unwrap();
        (temp_dir, workspace_root)
    }

    #[test]
    fn test_member_vendor_becomes_link() {
        let (temp, root) = monorepo();
        let member_vendor = temp.path().join("packages/a/vendor");
        fs::create_dir_all(member_vendor.join("stale")).unwrap();
        fs::write(member_vendor.join("stale/old.php"), "<?php").unwrap();

        let outcomes = DependencyDirectoryLinker::new(&root).link_all().unwrap();

        assert_eq!(
            outcomes,
            [
                ("pkg-a".to_string(), LinkOutcome::Linked),
                ("pkg-b".to_string(), LinkOutcome::Linked)
            ]
        );
        let metadata = fs::symlink_metadata(&member_vendor).unwrap();
        assert!(metadata.file_type().is_symlink());
        assert_eq!(
            member_vendor.canonicalize().unwrap(),
            root.vendor_directory().canonicalize().unwrap()
        );
        assert!(member_vendor.join("autoload.php").exists());
        assert!(!member_vendor.join("stale").exists());
        // shared contents survive
        assert!(root.vendor_directory().join("lib/x").is_dir());
    }

    #[test]
    fn test_no_staging_paths_left_behind() {
        let (temp, root) = monorepo();
        fs::create_dir_all(temp.path().join("packages/a/vendor")).unwrap();

        DependencyDirectoryLinker::new(&root).link_all().unwrap();

        for dir in ["packages/a", "packages/b"] {
            let directory = temp.path().join(dir);
            assert!(fs::symlink_metadata(directory.join(ALIAS_NAME)).is_err());
            assert!(fs::symlink_metadata(directory.join(BACKUP_NAME)).is_err());
        }
    }

    #[test]
    fn test_second_run_leaves_links_alone() {
        let (_temp, root) = monorepo();
        let linker = DependencyDirectoryLinker::new(&root);

        linker.link_all().unwrap();
        let outcomes = linker.link_all().unwrap();

        assert!(
            outcomes
                .iter()
                .all(|(_, outcome)| *outcome == LinkOutcome::AlreadyLinked)
        );
    }

    #[test]
    fn test_stale_staging_paths_are_replaced() {
        let (temp, root) = monorepo();
        let member = root.workspace_by_name("pkg-b").unwrap();
        fs::create_dir_all(temp.path().join("packages/b").join(BACKUP_NAME)).unwrap();
        fs::write(temp.path().join("packages/b").join(ALIAS_NAME), "junk").unwrap();

        let outcome = DependencyDirectoryLinker::new(&root)
            .link_workspace(member)
            .unwrap();

        assert_eq!(outcome, LinkOutcome::Linked);
        assert!(member.vendor_directory().join("autoload.php").exists());
    }

    #[test]
    fn test_missing_shared_vendor_touches_nothing() {
        let (temp, root) = monorepo();
        fs::remove_dir_all(root.vendor_directory()).unwrap();
        let member_vendor = temp.path().join("packages/a/vendor");
        fs::create_dir_all(&member_vendor).unwrap();
        fs::write(member_vendor.join("keep.php"), "<?php").unwrap();

        let result = DependencyDirectoryLinker::new(&root).link_all();

        assert!(matches!(result, Err(Error::SharedVendorMissing { .. })));
        assert!(member_vendor.join("keep.php").exists());
    }

    #[test]
    fn test_root_listed_as_workspace_is_skipped() {
        let (temp, _) = monorepo();
        fs::write(temp.path().join("composer.json"), r#"{"name": "acme/monorepo"}"#).unwrap();
        let mut root = WorkspaceRoot::new(temp.path())
            .unwrap()
            .with_globs(&[".".to_string(), "packages/a".to_string()]);
        root.scan_workspaces(&MemoryIo::new()).unwrap();

        let outcomes = DependencyDirectoryLinker::new(&root).link_all().unwrap();

        assert_eq!(outcomes[0], ("acme/monorepo".to_string(), LinkOutcome::Skipped));
        assert_eq!(outcomes[1].1, LinkOutcome::Linked);
        assert!(
            !fs::symlink_metadata(root.vendor_directory())
                .unwrap()
                .file_type()
                .is_symlink()
        );
    }
}
