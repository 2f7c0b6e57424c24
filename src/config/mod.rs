//! App configuration as handed over by the platform in `config.json`.
//!
//! The platform writes every app parameter into one flat JSON object and
//! adds a handful of bookkeeping keys (`_app`, `_inputs`, ...). Optional
//! parameters left blank in the UI arrive as `""`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::{common, ErrorCode, Result, UtilsError};

pub mod loader;

pub use loader::{load_config, ConfigLoader, LoadedConfig, DEFAULT_CONFIG_FILE};

/// Bookkeeping keys injected by the platform that are not app parameters.
pub const PLATFORM_KEYS: [&str; 5] = ["_app", "_tid", "_inputs", "_outputs", "_rule"];

/// Replace every parameter whose value is exactly `""` with `null`.
pub fn convert_empty_to_null(config: &mut Map<String, Value>) {
    for value in config.values_mut() {
        if value.as_str() == Some("") {
            *value = Value::Null;
        }
    }
}

/// Drop the platform bookkeeping keys, leaving only app parameters.
pub fn strip_platform_keys(config: &mut Map<String, Value>) {
    for key in PLATFORM_KEYS {
        config.remove(key);
    }
}

/// Ids of the `_inputs` entries of a raw (not yet stripped) config.
///
/// Entries without a string `id` are skipped.
pub fn input_names(config: &Map<String, Value>) -> Vec<String> {
    config
        .get("_inputs")
        .and_then(Value::as_array)
        .map(|inputs| {
            inputs
                .iter()
                .filter_map(|input| input.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Normalized app parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AppConfig {
    params: Map<String, Value>,
}

impl AppConfig {
    /// Wrap an already-parsed parameter map and normalize it.
    pub fn from_map(mut params: Map<String, Value>) -> Self {
        convert_empty_to_null(&mut params);
        strip_platform_keys(&mut params);
        Self { params }
    }

    /// Build from any JSON value; the value must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(UtilsError::config_with_code(
                ErrorCode::CONFIG_NOT_OBJECT,
                format!("expected a JSON object, got {}", json_kind(&other)),
                None,
            )),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Remove a parameter and return its value.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.params.remove(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.params.insert(key.into(), value)
    }

    /// String parameter; `Ok(None)` when absent or null.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(invalid_param(key, "a string")),
        }
    }

    /// Numeric parameter. Numeric strings are accepted since the UI
    /// sometimes submits numbers as text.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid_param(key, "a number")),
            Some(_) => Err(invalid_param(key, "a number")),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(invalid_param(key, "a boolean")),
        }
    }

    pub fn get_path(&self, key: &str) -> Result<Option<PathBuf>> {
        Ok(self.get_str(key)?.map(PathBuf::from))
    }

    /// Remove a path-valued parameter.
    ///
    /// Returns `Ok(None)` when the key is absent or null; any non-string
    /// value is reported as a wrong-type error naming the key.
    pub fn take_path(&mut self, key: &str) -> Result<Option<PathBuf>> {
        match self.params.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(PathBuf::from(s))),
            Some(_) => Err(common::wrong_type("Config", key, "a file path string")),
        }
    }
}

fn invalid_param(key: &str, expected: &str) -> UtilsError {
    UtilsError::config_with_code(
        ErrorCode::CONFIG_INVALID_VALUE,
        format!("parameter '{}' must be {}", key, expected),
        None,
    )
}

/// Human-readable name of a JSON value's type, as used in error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a dictionary",
    }
}
