//! Core abstractions for Composer monorepo workspaces.
//!
//! - **Traits** - the seams towards the host: the I/O collaborator and the
//!   dependency resolver's repository manager
//! - **Types** - discovered workspaces, the member-side root pointer and
//!   repository descriptors

pub mod traits;
pub mod types;

pub use traits::{Io, RepositoryManager};
pub use types::{PATH_REPOSITORY_TYPE, Repository, RepositoryList, Workspace, WorkspaceConfig};
