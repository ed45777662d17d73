//! Post-install reconciliation of the root manifest.
//!
//! An external merge step unions every workspace's `require`/`require-dev`
//! into the root package before installing. Afterwards the root
//! `composer.json` is rewritten from its on-disk baseline:
//!
//! - dependency sections are taken from the merged package minus every
//!   workspace name, since workspaces are served by path repositories,
//! - `autoload`/`autoload-dev` are taken verbatim from the merged package,
//! - every other key keeps its baseline value and position.

use crate::core::traits::{Io, RepositoryManager};
use crate::core::types::RepositoryList;
use crate::discovery::WorkspaceRoot;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::resolver::LinkGraphBuilder;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Dependency sections stripped of workspace names.
pub const DEPENDENCY_SECTIONS: [&str; 2] = ["require", "require-dev"];

/// Sections copied from the merged package.
pub const AUTOLOAD_SECTIONS: [&str; 2] = ["autoload", "autoload-dev"];

/// Result of a reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The manifest to persist.
    pub manifest: Manifest,
    /// The rebuilt resolver repositories: every workspace as a path
    /// repository, then the baseline's own repositories.
    pub repositories: RepositoryList,
    /// Workspace names that were dropped from the dependency sections.
    pub removed: Vec<String>,
}

/// Rewrites the root manifest of one workspace root.
pub struct ManifestReconciler<'a> {
    root: &'a WorkspaceRoot,
}

impl<'a> ManifestReconciler<'a> {
    /// Creates a reconciler for a scanned root.
    #[must_use]
    pub const fn new(root: &'a WorkspaceRoot) -> Self {
        Self { root }
    }

    /// Computes the reconciled manifest without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the on-disk baseline is missing or malformed, or if
    /// the merged package has a malformed section.
    pub fn reconcile(&self, merged: &Manifest) -> Result<Reconciliation> {
        let mut manifest = self.root.read_manifest()?;
        let names: HashSet<&str> = self.root.workspace_names().collect();
        let mut removed = Vec::new();

        for key in DEPENDENCY_SECTIONS {
            let section = merged.section(key).map_err(in_merged)?;
            let (kept, dropped) = strip_workspaces(section, &names);
            for name in dropped {
                if !removed.contains(&name) {
                    removed.push(name);
                }
            }

            if kept.is_empty() && !manifest.contains_key(key) {
                continue;
            }
            manifest.set(key, Value::Object(kept));
        }

        for key in AUTOLOAD_SECTIONS {
            match merged.get(key) {
                Some(section) => manifest.set(key, section.clone()),
                None => {
                    manifest.remove(key);
                }
            }
        }

        let mut repositories = RepositoryList::from_manifest(&manifest)
            .map_err(|e| at_path(e, self.root))?;
        LinkGraphBuilder::new(self.root).configure_root(&mut repositories)?;

        Ok(Reconciliation {
            manifest,
            repositories,
            removed,
        })
    }

    /// Reconciles and persists the root manifest.
    ///
    /// Nothing is written unless the whole reconciliation succeeds.
    ///
    /// # Errors
    ///
    /// See [`ManifestReconciler::reconcile`]; also fails if the manifest
    /// cannot be written.
    #[tracing::instrument(skip_all, fields(root = %self.root.path().display()))]
    pub fn reconcile_and_write(&self, merged: &Manifest, io: &dyn Io) -> Result<Reconciliation> {
        let reconciliation = self.reconcile(merged)?;
        self.root.write_manifest(&reconciliation.manifest)?;

        if !reconciliation.removed.is_empty() {
            io.write(&format!(
                "Removed workspace requirements from {}: {}",
                self.root.manifest_path().display(),
                reconciliation.removed.join(", ")
            ));
        }
        tracing::info!(
            removed = reconciliation.removed.len(),
            repositories = reconciliation.repositories.repositories().len(),
            "Reconciled root manifest"
        );
        Ok(reconciliation)
    }
}

fn strip_workspaces(
    section: Map<String, Value>,
    names: &HashSet<&str>,
) -> (Map<String, Value>, Vec<String>) {
    let mut kept = Map::new();
    let mut dropped = Vec::new();

    for (package, constraint) in section {
        if names.contains(package.as_str()) {
            dropped.push(package);
        } else {
            kept.insert(package, constraint);
        }
    }

    (kept, dropped)
}

fn in_merged(error: Error) -> Error {
    match error {
        Error::InvalidManifest { message, .. } => {
            Error::invalid_manifest(None, format!("merged root package: {message}"))
        }
        other => other,
    }
}

fn at_path(error: Error, root: &WorkspaceRoot) -> Error {
    match error {
        Error::InvalidManifest { message, .. } => {
            Error::invalid_manifest(Some(root.manifest_path()), message)
        }
        other => other,
    }
}
