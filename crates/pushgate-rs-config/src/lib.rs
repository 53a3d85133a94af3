//! Configuration model, path sanitization and validated config loading.
//!
//! Untrusted input (a JSON object or a path to a JSON file) only becomes a
//! [`PushConfig`] by passing through [`ConfigValidator`], which checks the
//! required fields and sanitizes the signing key path.

mod error;
mod loader;
mod model;
mod sanitizer;
mod validator;

/// Public error types returned by config loading and validation APIs.
pub use error::{ConfigError, PathError};
/// File-based config loader.
pub use loader::ConfigLoader;
/// Trusted and untrusted configuration models.
pub use model::{PushConfig, RawConfig};
/// Path sanitization.
pub use sanitizer::{CONFIG_FILE_EXTENSIONS, KEY_FILE_EXTENSIONS, PathSanitizer};
/// Field rules and the validator that produces a trusted config.
pub use validator::{ConfigValidator, FieldCheck, FieldRule, fields, push_config_rules};
