//! Monorepo workspaces for Composer projects.
//!
//! A root package lists directory globs in `extra.workspaces`; every matched
//! directory with a `composer.json` is a workspace. Member packages point back
//! at the root with `extra.workspace-root`.
//!
//! # Architecture
//!
//! The crate is driven by two hooks on [`Plugin`]:
//!
//! - [`Plugin::activate`] - before dependency resolution. Finds the root through
//!   the [`WorkspaceRootRegistry`], resolves the current [`Workspace`] and has
//!   the [`LinkGraphBuilder`] prepend a `path` repository for each sibling, so
//!   local packages shadow published ones.
//! - [`Plugin::on_post_install_or_update`] - after an install at the root. The
//!   [`ManifestReconciler`] rewrites the root `composer.json` from the merged
//!   package, then the [`DependencyDirectoryLinker`] replaces each member's
//!   `vendor` with a link to the root's.
//!
//! The host supplies two collaborators: an [`Io`] for status lines and a
//! [`RepositoryManager`] for the resolver's repository list. [`TracingIo`],
//! [`MemoryIo`] and [`RepositoryList`] are ready-made implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use composer_workspaces::{Plugin, Project, RepositoryList, TracingIo};
//! use std::path::Path;
//!
//! let io = TracingIo;
//! let mut plugin = Plugin::new(&io);
//! let project = Project::load(Path::new("packages/b"))?;
//!
//! let mut repositories = RepositoryList::default();
//! plugin.activate(&project, &mut repositories)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod core;
pub mod discovery;
pub mod error;
pub mod io;
pub mod manifest;
pub mod materializer;
pub mod path;
pub mod plugin;
pub mod reconcile;
pub mod resolver;

// Re-export core types
pub use core::{
    Io, PATH_REPOSITORY_TYPE, Repository, RepositoryList, RepositoryManager, Workspace,
    WorkspaceConfig,
};

// Re-export discovery types
pub use discovery::{WorkspaceRoot, WorkspaceRootRegistry, resolve_glob_patterns};

// Re-export hook types
pub use plugin::{Activation, Plugin, PostInstall, Project, Role, VERSION};

// Re-export post-install steps
pub use materializer::{DependencyDirectoryLinker, LinkOutcome, VENDOR_DIR_NAME};
pub use reconcile::{ManifestReconciler, Reconciliation};
pub use resolver::LinkGraphBuilder;

pub use io::{MemoryIo, TracingIo};
pub use manifest::{MANIFEST_FILE_NAME, Manifest};

// Re-export error types
pub use error::{Error, Result};
