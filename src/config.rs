//! Config file decoding.
//! The format is chosen from the file extension. Unknown or missing
//! extensions are decoded as TOML. Mapping keys are lower-cased at every
//! level, so `MyKey` in a file is looked up as `mykey`.

use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

/// Structured formats a config file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Picks the format for `path`, falling back to TOML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }

    /// Decodes `content` into its top-level entries, in document order, with
    /// lower-cased keys.
    pub fn decode(&self, content: &str) -> std::result::Result<IndexMap<String, Value>, String> {
        let root = match self {
            ConfigFormat::Json => serde_json::from_str::<serde_json::Value>(content)
                .map(Value::from)
                .map_err(|e| e.to_string())?,
            ConfigFormat::Yaml => serde_yaml::from_str::<serde_yaml::Value>(content)
                .map(Value::from)
                .map_err(|e| e.to_string())?,
            ConfigFormat::Toml => toml::from_str::<toml::Table>(content)
                .map(|table| Value::from(toml::Value::Table(table)))
                .map_err(|e| e.to_string())?,
        };

        match lowercase_keys(root) {
            Value::Mapping(entries) => Ok(entries),
            // An empty YAML document
            Value::Null => Ok(IndexMap::new()),
            other => Err(format!("expected a mapping at the top level, found {other}")),
        }
    }
}

/// Lower-cases mapping keys recursively. On a case collision the later key wins.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Reads and decodes the config file at `path`.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ConfigDecodeError` if the content does not decode in the selected format
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, Value>> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path);
    debug!("Loading configuration from {} as {:?}", path.display(), format);

    let content = std::fs::read_to_string(path).map_err(Error::IoError)?;
    format.decode(&content).map_err(|reason| Error::ConfigDecodeError {
        path: path.display().to_string(),
        reason,
    })
}
