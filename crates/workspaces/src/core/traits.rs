//! Traits at the boundary with the host dependency manager.

use crate::core::types::Repository;
use crate::error::Result;
use serde_json::{Map, Value};

/// Line-oriented output channel owned by the host.
///
/// Discovery reports skipped members through [`Io::write_error`]; the lifecycle
/// hooks report progress through [`Io::write`]. Nothing is ever read back.
pub trait Io {
    /// Writes a status line.
    fn write(&self, message: &str);

    /// Writes a warning or error line.
    fn write_error(&self, message: &str);
}

/// The host resolver's ordered list of repositories.
///
/// Repositories earlier in the list are consulted first, so anything that must
/// shadow a registry (local path repositories) is prepended.
///
/// # Example
///
/// ```rust,ignore
/// use composer_workspaces::{RepositoryList, RepositoryManager};
///
/// let mut manager = RepositoryList::default();
/// let mut config = serde_json::Map::new();
/// config.insert("url".into(), "../a".into());
///
/// let repository = manager.create_repository("path", config)?;
/// manager.prepend_repository(repository);
/// ```
pub trait RepositoryManager {
    /// Builds a repository of the given type from its configuration block.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not describe a valid
    /// repository.
    fn create_repository(&self, kind: &str, config: Map<String, Value>) -> Result<Repository>;

    /// Inserts a repository ahead of every repository already registered.
    fn prepend_repository(&mut self, repository: Repository);

    /// Appends a repository after every repository already registered.
    fn add_repository(&mut self, repository: Repository);

    /// Registered repositories, highest priority first.
    fn repositories(&self) -> &[Repository];
}
