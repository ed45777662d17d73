//! Lexical path algebra.
//!
//! Nothing here touches the filesystem: paths are normalized by folding `.` and
//! `..` components, and relative paths are computed component-wise. Callers that
//! need symlinks resolved canonicalize before handing paths in.

use std::path::{Component, Path, PathBuf};

/// Folds `.` and `..` components without consulting the filesystem.
///
/// A `..` directly below the root is dropped (`/..` is `/`); leading `..` of a
/// relative path are kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Returns the path that leads from `base` to `path`.
///
/// Both arguments are normalized first. Equal paths yield `.`. When the two
/// paths share no root (one absolute, one relative, or different drive
/// prefixes) the normalized `path` is returned unchanged.
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    if path.has_root() != base.has_root() || prefix_of(&path) != prefix_of(&base) {
        return path;
    }

    let target: Vec<Component<'_>> = path.components().collect();
    let origin: Vec<Component<'_>> = base.components().collect();

    let common = target
        .iter()
        .zip(origin.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for component in &origin[common..] {
        if matches!(component, Component::Normal(_)) {
            relative.push("..");
        }
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// Renders a path with forward slashes regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '\\' {
        rendered.replace('\\', "/")
    } else {
        rendered.into_owned()
    }
}

fn prefix_of(path: &Path) -> Option<Component<'_>> {
    match path.components().next() {
        Some(prefix @ Component::Prefix(_)) => Some(prefix),
        _ => None,
    }
}
