use super::{Context, emit};
use crate::errors::CliError;

pub fn version_info(json: bool) -> Result<String, CliError> {
    let name = env!("CARGO_PKG_NAME");
    let library = composer_workspaces::VERSION;
    let correlation_id = crate::tracing::correlation_id();

    tracing::debug!(package_name = name, library_version = library, "Gathering version information");

    if json {
        let info = serde_json::json!({
            "name": name,
            "version": env!("CARGO_PKG_VERSION"),
            "library": library,
            "correlation_id": correlation_id.to_string(),
        });
        return Ok(serde_json::to_string_pretty(&info)?);
    }

    Ok(format!(
        "{name} {} - {}\nLibrary: composer-workspaces {library}\nCorrelation ID: {correlation_id}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
    ))
}

pub fn execute(context: &Context) -> Result<(), CliError> {
    emit(&version_info(context.json)?, None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info_text() {
        let info = version_info(false).unwrap();
        assert!(info.starts_with("composer-workspaces-cli "));
        assert!(info.contains(env!("CARGO_PKG_VERSION")));
        assert!(info.contains("Correlation ID:"));
    }

    #[test]
    fn test_version_info_json() {
        let info: serde_json::Value = serde_json::from_str(&version_info(true).unwrap()).unwrap();
        assert_eq!(info["name"], "composer-workspaces-cli");
        assert_eq!(info["library"], composer_workspaces::VERSION);
    }
}
