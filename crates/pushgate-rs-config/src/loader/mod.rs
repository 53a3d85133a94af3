//! JSON config loading.
//!
//! Sanitizes the config file path, reads and parses the file into an untyped
//! object, then hands it to the validator. The untyped object never escapes
//! this module.

#[cfg(test)]
mod tests;

use crate::{ConfigError, ConfigValidator, PathSanitizer, PushConfig, RawConfig};
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Loads push configs from JSON files or strings.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    paths: PathSanitizer,
    validator: ConfigValidator,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::with_validator(ConfigValidator::default())
    }
}

impl ConfigLoader {
    /// Create a loader that validates with a custom validator.
    pub fn with_validator(validator: ConfigValidator) -> Self {
        Self {
            paths: PathSanitizer::config_files(),
            validator,
        }
    }

    /// Load and validate a config file. Only `.json` paths are accepted.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<PushConfig, ConfigError> {
        let path = self
            .paths
            .sanitize(path)
            .map_err(ConfigError::InvalidConfigPath)?;
        if !path.exists() {
            return Err(ConfigError::ConfigFileNotFound(path));
        }

        info!("loading config from path: {}", path.display());
        let contents = fs::read(&path).map_err(|source| ConfigError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        let origin = path.display().to_string();
        let map = parse_object(&contents, &origin)?;
        self.validator.validate(&map)
    }

    /// Parse and validate config contents held in memory.
    pub fn load_from_str(&self, contents: &str) -> Result<PushConfig, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let map = parse_object(contents.as_bytes(), "config")?;
        self.validator.validate(&map)
    }
}

impl PushConfig {
    /// Load and validate a config file with the default loader.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::default().load_from_path(path)
    }

    /// Parse and validate JSON config contents with the default loader.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        ConfigLoader::default().load_from_str(contents)
    }

    /// Validate an untyped config object.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        ConfigValidator::default().validate(map)
    }

    /// Validate a config assembled in code.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        Self::from_map(&raw.into_map())
    }
}

/// Parse raw bytes as a JSON object. Bytes that are not UTF-8 are malformed
/// content, not a read failure.
fn parse_object(contents: &[u8], origin: &str) -> Result<Map<String, Value>, ConfigError> {
    let value: Value = serde_json::from_slice(contents).map_err(|err| ConfigError::ConfigParse {
        origin: origin.to_string(),
        message: err.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::ConfigParse {
            origin: origin.to_string(),
            message: "config file must contain a valid JSON object".to_string(),
        }),
    }
}
