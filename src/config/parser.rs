//! Configuration file parsing (HOCON format).
//!
//! The HOCON document is resolved into a JSON value tree first so the typed
//! sections can lean on serde defaults for every missing key.

use std::path::Path;

use hocon::{Hocon, HoconLoader};
use serde_json::Value;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Load configuration from a HOCON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let document = HoconLoader::new()
        .load_file(path)
        .map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })?
        .hocon()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;

    from_document(document)
}

/// Load configuration from a HOCON string.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    let document = HoconLoader::new()
        .load_str(content)
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?
        .hocon()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;

    from_document(document)
}

fn from_document(document: Hocon) -> Result<Config, ConfigError> {
    match to_json(document) {
        // An empty file resolves to nothing at all.
        Value::Null => Ok(Config::default()),
        value => serde_json::from_value(value).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        }),
    }
}

fn to_json(value: Hocon) -> Value {
    match value {
        Hocon::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Hocon::Integer(i) => Value::from(i),
        Hocon::String(s) => Value::String(s),
        Hocon::Boolean(b) => Value::Bool(b),
        Hocon::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        Hocon::Hash(map) => Value::Object(
            map.into_iter()
                .map(|(key, child)| (key, to_json(child)))
                .collect(),
        ),
        _ => Value::Null,
    }
}
