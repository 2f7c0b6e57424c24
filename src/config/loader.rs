use super::{input_names, AppConfig};
use crate::error::{common, ErrorCode, ErrorExt, Result, UtilsError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file name the platform writes app parameters to.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Load `config.json`, then blank-to-null and strip platform keys.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    ConfigLoader::new(path.as_ref()).load()
}

/// A config together with the platform input ids captured before the
/// `_inputs` key was stripped.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub inputs: Vec<String>,
}

pub struct ConfigLoader {
    path: PathBuf,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AppConfig> {
        Ok(self.load_with_inputs()?.config)
    }

    pub fn load_with_inputs(&self) -> Result<LoadedConfig> {
        let raw = self.read_raw()?;
        let map = match raw {
            Value::Object(map) => map,
            other => {
                return Err(UtilsError::config_with_code(
                    ErrorCode::CONFIG_NOT_OBJECT,
                    format!(
                        "top level of config must be a JSON object, got {}",
                        super::json_kind(&other)
                    ),
                    Some(self.path.clone()),
                ))
            }
        };

        let inputs = input_names(&map);
        let config = AppConfig::from_map(map);
        debug!(
            path = %self.path.display(),
            params = config.len(),
            inputs = inputs.len(),
            "Loaded app configuration"
        );

        Ok(LoadedConfig { config, inputs })
    }

    fn read_raw(&self) -> Result<Value> {
        if !self.path.exists() {
            return Err(common::config_not_found(&self.path));
        }

        let content = fs::read_to_string(&self.path).to_config_error(format!(
            "Failed to read {}",
            self.path.display()
        ))?;

        serde_json::from_str(&content).map_err(|e| {
            UtilsError::config_with_code(
                ErrorCode::CONFIG_INVALID_JSON,
                format!("{} is not valid JSON", self.path.display()),
                Some(self.path.clone()),
            )
            .with_source(e)
        })
    }
}
