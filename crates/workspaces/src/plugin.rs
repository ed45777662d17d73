//! The two lifecycle hooks a host calls.
//!
//! - [`Plugin::activate`] runs before dependency resolution and registers the
//!   current member's siblings as path repositories.
//! - [`Plugin::on_post_install_or_update`] runs at the root after the install
//!   and rewrites the root manifest, then links member `vendor` directories.

use crate::core::traits::{Io, RepositoryManager};
use crate::core::types::WorkspaceConfig;
use crate::discovery::{WorkspaceRoot, WorkspaceRootRegistry};
use crate::error::{Error, Result};
use crate::manifest::{MANIFEST_FILE_NAME, Manifest};
use crate::materializer::{DependencyDirectoryLinker, LinkOutcome};
use crate::reconcile::{ManifestReconciler, Reconciliation};
use crate::resolver::LinkGraphBuilder;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How a package takes part in a monorepo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Declares `extra.workspaces`.
    Root,
    /// Declares `extra.workspace-root`.
    Member,
    /// Neither.
    Standalone,
}

/// The package the host is running for.
#[derive(Debug, Clone)]
pub struct Project {
    directory: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Loads the package in `directory` from its `composer.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or its manifest is
    /// missing or malformed.
    pub fn load(directory: &Path) -> Result<Self> {
        let directory = directory
            .canonicalize()
            .map_err(|e| Error::io(e, directory, "resolving project directory"))?;
        let manifest = Manifest::from_path(&directory.join(MANIFEST_FILE_NAME))?;
        Ok(Self {
            directory,
            manifest,
        })
    }

    /// Wraps an already loaded manifest.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Self {
            directory: directory.into(),
            manifest,
        }
    }

    /// The package directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The package manifest as the host loaded it.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The package's role; a root that also names a root counts as a root.
    /// [`Plugin::activate`] still configures such a package as a member.
    #[must_use]
    pub fn role(&self) -> Role {
        if self.manifest.is_workspace_root() {
            Role::Root
        } else if self.manifest.is_workspace() {
            Role::Member
        } else {
            Role::Standalone
        }
    }
}

/// Result of [`Plugin::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Sibling path repositories were prepended for this member.
    Configured {
        /// The member's declared name.
        workspace: String,
        /// How many repositories were prepended.
        repositories: usize,
    },
    /// The project is not a member; nothing was registered.
    Skipped(Role),
}

/// Result of [`Plugin::on_post_install_or_update`].
#[derive(Debug, Clone, PartialEq)]
pub enum PostInstall {
    /// The root manifest was rewritten and members were linked.
    Completed {
        /// What was written to the root manifest.
        reconciliation: Reconciliation,
        /// Link outcome per workspace, in discovery order.
        links: Vec<(String, LinkOutcome)>,
    },
    /// The project is not the root; nothing was done.
    Skipped(Role),
}

/// Hook entry points sharing one registry for the whole invocation.
pub struct Plugin<'io> {
    io: &'io dyn Io,
    registry: WorkspaceRootRegistry,
}

impl<'io> Plugin<'io> {
    /// Creates a plugin reporting through `io`.
    #[must_use]
    pub fn new(io: &'io dyn Io) -> Self {
        Self {
            io,
            registry: WorkspaceRootRegistry::new(),
        }
    }

    /// Roots scanned so far.
    #[must_use]
    pub const fn registry(&self) -> &WorkspaceRootRegistry {
        &self.registry
    }

    /// The root `project` belongs to, scanned on first use.
    ///
    /// A root resolves from its own manifest, a member through its
    /// `extra.workspace-root`. Standalone packages have none.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be located, read or scanned.
    pub fn workspace_root(&mut self, project: &Project) -> Result<Option<Rc<WorkspaceRoot>>> {
        let root = match project.role() {
            Role::Root => self.registry.create_workspace_root(
                project.directory(),
                Some(project.manifest()),
                self.io,
            )?,
            Role::Member => self.enclosing_root(project)?,
            Role::Standalone => return Ok(None),
        };
        Ok(Some(root))
    }

    /// The root named by the project's `extra.workspace-root`.
    fn enclosing_root(&mut self, project: &Project) -> Result<Rc<WorkspaceRoot>> {
        let config = WorkspaceConfig::from_manifest(project.manifest(), project.directory())?;
        self.registry
            .create_workspace_root(config.workspace_root_directory(), None, self.io)
    }

    /// Pre-resolution hook: prepends a path repository for every sibling of
    /// the current member.
    ///
    /// Any package declaring `extra.workspace-root` is configured, including a
    /// nested root that also declares `extra.workspaces`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedWorkspace`] if the project directory is not
    /// one of the root's workspaces, or any discovery error.
    #[tracing::instrument(skip_all, fields(project = %project.directory().display()))]
    pub fn activate<R>(&mut self, project: &Project, manager: &mut R) -> Result<Activation>
    where
        R: RepositoryManager + ?Sized,
    {
        if !project.manifest().is_workspace() {
            let role = project.role();
            tracing::debug!(?role, "Not a workspace member, nothing to activate");
            return Ok(Activation::Skipped(role));
        }

        let root = self.enclosing_root(project)?;

        let directory = project
            .directory()
            .canonicalize()
            .unwrap_or_else(|_| project.directory().to_path_buf());
        let workspace = root
            .resolve_workspace(&directory)
            .ok_or(Error::UnresolvedWorkspace { path: directory })?;

        let before = manager.repositories().len();
        LinkGraphBuilder::new(&root).configure_workspace(workspace, manager)?;
        let repositories = manager.repositories().len() - before;

        tracing::info!(
            workspace = workspace.name(),
            repositories,
            "Registered sibling path repositories"
        );
        Ok(Activation::Configured {
            workspace: workspace.name().to_string(),
            repositories,
        })
    }

    /// Post-install hook: reconciles the root manifest against the merged
    /// package, then links every member's `vendor` to the root's.
    ///
    /// # Errors
    ///
    /// Returns the first reconciliation or linking error; linking does not
    /// start if reconciliation failed.
    #[tracing::instrument(skip_all, fields(project = %project.directory().display()))]
    pub fn on_post_install_or_update(
        &mut self,
        project: &Project,
        merged: &Manifest,
    ) -> Result<PostInstall> {
        let role = project.role();
        if role != Role::Root {
            tracing::info!(?role, "Post-install runs at the workspace root only");
            return Ok(PostInstall::Skipped(role));
        }

        let Some(root) = self.workspace_root(project)? else {
            return Ok(PostInstall::Skipped(role));
        };

        self.io.write("Cleaning up after merge plugin..");
        let reconciliation = ManifestReconciler::new(&root).reconcile_and_write(merged, self.io)?;

        self.io.write("Symlinking vendor for workspaces..");
        let links = DependencyDirectoryLinker::new(&root).link_all()?;

        Ok(PostInstall::Completed {
            reconciliation,
            links,
        })
    }
}
