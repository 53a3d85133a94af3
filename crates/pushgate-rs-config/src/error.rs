//! Error types for path sanitization and config loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while sanitizing a caller-supplied path.
#[derive(Debug, Error)]
pub enum PathError {
    /// The input was empty or could not be treated as a path.
    #[error("invalid file path provided: {0}")]
    Invalid(String),
    /// The input contains a `..` segment.
    #[error("path traversal detected in file path: {path}")]
    Traversal { path: String },
    /// The extension is not in the allow list.
    #[error("file extension {extension:?} is not allowed: {}", .path.display())]
    DisallowedExtension { path: PathBuf, extension: String },
}

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is absent, null or empty.
    #[error("missing required config field: {0}")]
    MissingField(String),
    /// A field is present with the wrong type.
    #[error("invalid config field {field}: {message}")]
    InvalidField { field: String, message: String },
    /// The key path failed sanitization.
    #[error("invalid key file path: {0}")]
    InvalidKeyPath(#[source] PathError),
    /// No key file exists at the sanitized key path.
    #[error("key file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),
    /// The config file path failed sanitization.
    #[error("invalid config file path: {0}")]
    InvalidConfigPath(#[source] PathError),
    /// No config file exists at the sanitized path.
    #[error("config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),
    /// Reading a config file failed.
    #[error("failed to read config {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config contents are not a JSON object.
    #[error("invalid config file format ({origin}): {message}")]
    ConfigParse { origin: String, message: String },
}

impl ConfigError {
    /// Name of the offending field, for field-level errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField(field) | ConfigError::InvalidField { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}
