use super::{Context, emit};
use crate::errors::CliError;
use crate::io::ConsoleIo;
use composer_workspaces::{Io, LinkOutcome, Manifest, Plugin, PostInstall, Project};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Reads the merged root package from a file, or from stdin for `-`.
pub fn read_merged(path: &Path) -> Result<Manifest, CliError> {
    let read = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        fs::read_to_string(path)
    };
    let content = read.map_err(|source| CliError::ReadMerged {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.parse::<Manifest>()?)
}

pub const fn outcome_label(outcome: LinkOutcome) -> &'static str {
    match outcome {
        LinkOutcome::Linked => "linked",
        LinkOutcome::AlreadyLinked => "already linked",
        LinkOutcome::Skipped => "skipped",
    }
}

/// Runs the post-install hook against the merged root package.
pub fn execute(context: &Context, merged: &Path) -> Result<(), CliError> {
    let merged = read_merged(merged)?;
    let project = Project::load(&context.cwd)?;
    let io = ConsoleIo::new(context.json);

    let mut plugin = Plugin::new(&io);
    match plugin.on_post_install_or_update(&project, &merged)? {
        PostInstall::Completed {
            reconciliation,
            links,
        } => {
            if context.json {
                let links: Vec<_> = links
                    .iter()
                    .map(|(name, outcome)| json!({"name": name, "outcome": outcome_label(*outcome)}))
                    .collect();
                let summary = json!({
                    "removed": reconciliation.removed,
                    "repositories": reconciliation.repositories,
                    "links": links,
                });
                return emit(&serde_json::to_string_pretty(&summary)?, None);
            }
            for (name, outcome) in &links {
                io.write(&format!("  {name}: {}", outcome_label(*outcome)));
            }
        }
        PostInstall::Skipped(role) => {
            tracing::info!(?role, "Post-install skipped");
            if context.json {
                return emit(&json!({"skipped": true}).to_string(), None);
            }
            io.write("Not a workspace root, nothing to reconcile");
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_merged_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("merged.json");
        fs::write(&path, r#"{"require": {"lib/x": "^1.0"}}"#).unwrap();

        let manifest = read_merged(&path).unwrap();
        assert!(manifest.contains_key("require"));
    }

    #[test]
    fn test_read_merged_missing_file() {
        let result = read_merged(Path::new("/nonexistent/merged.json"));
        assert!(matches!(result, Err(CliError::ReadMerged { .. })));
    }

    #[test]
    fn test_read_merged_rejects_non_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("merged.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(read_merged(&path), Err(CliError::Workspace(_))));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(LinkOutcome::Linked), "linked");
        assert_eq!(outcome_label(LinkOutcome::AlreadyLinked), "already linked");
    }
}
