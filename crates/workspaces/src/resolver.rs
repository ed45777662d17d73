//! Local path repositories for workspace siblings.
//!
//! [`LinkGraphBuilder`] turns a scanned [`WorkspaceRoot`] into `path`
//! repositories and prepends them to the host resolver, so that a sibling
//! package on disk always shadows a published package with the same name.

use crate::core::traits::RepositoryManager;
use crate::core::types::{PATH_REPOSITORY_TYPE, Workspace};
use crate::discovery::WorkspaceRoot;
use crate::error::Result;
use serde_json::{Map, Value};

/// Builds the local repository graph of one workspace root.
pub struct LinkGraphBuilder<'a> {
    root: &'a WorkspaceRoot,
}

impl<'a> LinkGraphBuilder<'a> {
    /// Creates a builder over a scanned root.
    #[must_use]
    pub const fn new(root: &'a WorkspaceRoot) -> Self {
        Self { root }
    }

    /// Repository URLs of every sibling of `workspace`, relative to its
    /// directory, in discovery order.
    ///
    /// Siblings are told apart from `workspace` by relative path, so two
    /// packages declaring the same name in different directories still link to
    /// each other.
    #[must_use]
    pub fn sibling_urls(&self, workspace: &Workspace) -> Vec<String> {
        self.root
            .workspaces()
            .filter(|other| other.relative_path() != workspace.relative_path())
            .map(|other| other.path_relative_to(workspace.absolute_path()))
            .collect()
    }

    /// Repository URLs of every workspace, relative to the root directory.
    #[must_use]
    pub fn root_urls(&self) -> Vec<String> {
        self.root
            .workspaces()
            .map(|workspace| workspace.path_relative_to(self.root.path()))
            .collect()
    }

    /// Prepends a `path` repository for every sibling of `workspace`.
    ///
    /// Must run before the host starts resolving dependencies.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager rejects a repository configuration.
    pub fn configure_workspace<R>(&self, workspace: &Workspace, manager: &mut R) -> Result<()>
    where
        R: RepositoryManager + ?Sized,
    {
        prepend_all(manager, self.sibling_urls(workspace))
    }

    /// Prepends a `path` repository for every workspace, as seen from the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager rejects a repository configuration.
    pub fn configure_root<R>(&self, manager: &mut R) -> Result<()>
    where
        R: RepositoryManager + ?Sized,
    {
        prepend_all(manager, self.root_urls())
    }
}

fn prepend_all<R>(manager: &mut R, urls: Vec<String>) -> Result<()>
where
    R: RepositoryManager + ?Sized,
{
    for url in urls {
        tracing::debug!(url = %url, "Prepending path repository");
        let repository = manager.create_repository(PATH_REPOSITORY_TYPE, path_config(url))?;
        manager.prepend_repository(repository);
    }
    Ok(())
}

fn path_config(url: String) -> Map<String, Value> {
    let mut config = Map::new();
    config.insert("url".to_string(), Value::String(url));
    config
}
