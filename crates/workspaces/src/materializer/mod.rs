//! Materialization of the shared dependency directory into workspaces.
//!
//! After an install at the monorepo root, every member's `vendor` directory is
//! replaced by a link to the root's `vendor`, so all packages share one set of
//! installed dependencies.

pub mod vendor;

pub use vendor::{DependencyDirectoryLinker, LinkOutcome};

use std::fs;
use std::io;
use std::path::Path;

/// Directory name of installed dependencies.
pub const VENDOR_DIR_NAME: &str = "vendor";

/// Removes whatever is at `path`: a directory tree, a file, or a symlink
/// (never its target). Returns `false` if nothing was there.
pub(crate) fn remove_path(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.file_type().is_symlink() {
        remove_link(path)?;
    } else if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

#[cfg(unix)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// Directory symlinks on Windows are removed as directories.
#[cfg(windows)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_dir(path).or_else(|_| fs::remove_file(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_path_directory_tree() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path().join("vendor");
        fs::create_dir_all(vendor.join("acme/lib/src")).unwrap();
        fs::write(vendor.join("acme/lib/src/Lib.php"), "<?php").unwrap();

        assert!(remove_path(&vendor).unwrap());
        assert!(!vendor.exists());
        assert!(!remove_path(&vendor).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_path_leaves_link_target() {
        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("autoload.php"), "<?php").unwrap();

        let link = temp_dir.path().join("vendor");
        std::os::unix::fs::symlink(&shared, &link).unwrap();

        assert!(remove_path(&link).unwrap());
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(shared.join("autoload.php").exists());
    }
}
