//! `composer.json` as a neutral ordered document.
//!
//! The manifest is kept as a JSON object with its keys in file order so that a
//! load/modify/dump cycle only touches the keys that were rewritten.

use crate::core::types::Repository;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name of a package manifest.
pub const MANIFEST_FILE_NAME: &str = "composer.json";

/// Keys under `extra` understood by the workspace tooling.
const EXTRA_KEY: &str = "extra";
const WORKSPACES_KEY: &str = "workspaces";
const WORKSPACE_ROOT_KEY: &str = "workspace-root";
const REPOSITORIES_KEY: &str = "repositories";

/// A parsed `composer.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    document: Map<String, Value>,
}

impl Manifest {
    /// Loads a manifest from an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidManifest`] unless `value` is a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(document) => Ok(Self { document }),
            other => Err(Error::invalid_manifest(
                None,
                format!("expected a JSON object, found {}", json_type(&other)),
            )),
        }
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotFound`] if the file does not exist, and an
    /// I/O, JSON or shape error carrying `path` otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(Error::io(e, path, "reading manifest")),
        };

        let value: Value = serde_json::from_str(&content).map_err(|e| Error::Json {
            source: e,
            path: Some(path.to_path_buf()),
        })?;

        Self::from_value(value).map_err(|e| match e {
            Error::InvalidManifest { message, .. } => {
                Error::invalid_manifest(Some(path.to_path_buf()), message)
            }
            other => other,
        })
    }

    /// Dumps the manifest back to a document.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Top-level entries in document order.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Looks up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Whether a top-level key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.document.contains_key(key)
    }

    /// Sets a top-level key; an existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.document.insert(key.into(), value);
    }

    /// Removes a top-level key, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.document.shift_remove(key)
    }

    /// Declared package name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    fn extra(&self) -> Option<&Map<String, Value>> {
        self.document.get(EXTRA_KEY).and_then(Value::as_object)
    }

    /// Whether the package is a monorepo root (`extra.workspaces` is set).
    #[must_use]
    pub fn is_workspace_root(&self) -> bool {
        self.extra().is_some_and(|extra| extra.contains_key(WORKSPACES_KEY))
    }

    /// Whether the package is a monorepo member (`extra.workspace-root` is set).
    #[must_use]
    pub fn is_workspace(&self) -> bool {
        self.extra()
            .is_some_and(|extra| extra.contains_key(WORKSPACE_ROOT_KEY))
    }

    /// The member's `extra.workspace-root` pointer, if it is a string.
    #[must_use]
    pub fn workspace_root_pointer(&self) -> Option<&str> {
        self.extra()
            .and_then(|extra| extra.get(WORKSPACE_ROOT_KEY))
            .and_then(Value::as_str)
    }

    /// The root's `extra.workspaces` directory globs.
    ///
    /// A single string is accepted as a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidManifest`] if the entry is neither a string nor
    /// a list of strings.
    pub fn workspace_globs(&self) -> Result<Option<Vec<String>>> {
        let Some(value) = self.extra().and_then(|extra| extra.get(WORKSPACES_KEY)) else {
            return Ok(None);
        };

        match value {
            Value::String(glob) => Ok(Some(vec![glob.clone()])),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::invalid_manifest(None, "extra.workspaces entries must be strings")
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            other => Err(Error::invalid_manifest(
                None,
                format!(
                    "extra.workspaces must be a list of globs, found {}",
                    json_type(other)
                ),
            )),
        }
    }

    /// A dependency-style section (`require`, `require-dev`, ...) as a map.
    ///
    /// Absent sections and the empty list some serializers emit for an empty
    /// map both yield an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidManifest`] if the section is not a JSON object.
    pub fn section(&self, key: &str) -> Result<Map<String, Value>> {
        match self.document.get(key) {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(section)) => Ok(section.clone()),
            Some(Value::Array(items)) if items.is_empty() => Ok(Map::new()),
            Some(other) => Err(Error::invalid_manifest(
                None,
                format!("'{key}' must be an object, found {}", json_type(other)),
            )),
        }
    }

    /// Repositories declared by the manifest, in declaration order.
    ///
    /// Both the list form and the keyed object form are accepted. Boolean
    /// entries only toggle a default registry and are skipped: `false` values
    /// in the keyed form, and `{"packagist.org": false}` objects in a list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidManifest`] if an entry is not a repository
    /// object with a `type`.
    pub fn repositories(&self) -> Result<Vec<Repository>> {
        let entries: Vec<&Value> = match self.document.get(REPOSITORIES_KEY) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Object(map)) => map.values().collect(),
            Some(other) => {
                return Err(Error::invalid_manifest(
                    None,
                    format!("'repositories' must be a list, found {}", json_type(other)),
                ));
            }
        };

        let mut repositories = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                Value::Bool(_) => {}
                Value::Object(map) if is_toggle(map) => {}
                Value::Object(_) => {
                    let repository = serde_json::from_value(entry.clone()).map_err(|e| {
                        Error::invalid_manifest(None, format!("repository #{index}: {e}"))
                    })?;
                    repositories.push(repository);
                }
                other => {
                    return Err(Error::invalid_manifest(
                        None,
                        format!("repository #{index} must be an object, found {}", json_type(other)),
                    ));
                }
            }
        }

        Ok(repositories)
    }

    /// Pretty-printed bytes: four-space indentation, unescaped slashes and a
    /// trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.document.serialize(&mut serializer)?;
        buffer.push(b'\n');
        Ok(buffer)
    }

    /// Pretty-printed document, see [`Manifest::to_pretty_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.to_pretty_bytes()?).into_owned())
    }

    /// Writes the manifest to `path`.
    ///
    /// The document is fully serialized first, written to a sibling temporary
    /// file and renamed over `path`, so a failure never leaves a truncated
    /// manifest behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the write or the rename fails.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.to_pretty_bytes()?;
        let staging = staging_path(path);

        fs::write(&staging, bytes).map_err(|e| Error::io(e, &staging, "writing manifest"))?;
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(Error::io(e, path, "replacing manifest"));
        }

        tracing::debug!(path = %path.display(), "Wrote manifest");
        Ok(())
    }
}

impl FromStr for Manifest {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(content)?)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| MANIFEST_FILE_NAME.into(), |name| name.to_string_lossy());
    path.with_file_name(format!(".{file_name}.tmp"))
}

/// A list entry such as `{"packagist.org": false}`: no `type`, only booleans.
fn is_toggle(entry: &Map<String, Value>) -> bool {
    !entry.is_empty() && !entry.contains_key("type") && entry.values().all(Value::is_boolean)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
