use super::{Context, emit};
use crate::errors::CliError;
use crate::io::ConsoleIo;
use composer_workspaces::{Activation, Io, Plugin, Project, RepositoryList};
use std::path::Path;

/// Runs the pre-resolution hook and prints the resulting repository list:
/// sibling path repositories first, then the package's own.
pub fn execute(context: &Context, output: Option<&Path>) -> Result<(), CliError> {
    let io = ConsoleIo::new(context.json || output.is_none());
    let project = Project::load(&context.cwd)?;
    let mut repositories = RepositoryList::from_manifest(project.manifest())?;

    let mut plugin = Plugin::new(&io);
    match plugin.activate(&project, &mut repositories)? {
        Activation::Configured {
            workspace,
            repositories: added,
        } => io.write(&format!(
            "Registered {added} workspace path repositories for {workspace}"
        )),
        Activation::Skipped(role) => {
            tracing::info!(?role, "Activation skipped");
            io.write(&format!(
                "{} is not a workspace member, no path repositories registered",
                project.directory().display()
            ));
        }
    }

    emit(&serde_json::to_string_pretty(&repositories)?, output)
}
