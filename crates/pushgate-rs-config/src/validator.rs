//! Field rules and the validator that turns an untyped map into a
//! [`PushConfig`].

use crate::{ConfigError, PathError, PathSanitizer, PushConfig};
use log::debug;
use serde_json::{Map, Value};

/// JSON keys of the push config schema.
pub mod fields {
    pub const KEY_ID: &str = "keyId";
    pub const TEAM_ID: &str = "teamId";
    pub const BUNDLE_ID: &str = "bundleId";
    pub const DEVICE_TOKEN: &str = "deviceToken";
    pub const KEY_PATH: &str = "keyPath";
    pub const PRODUCTION: &str = "production";
}

/// Check applied to a single field. Receives the field name and its value,
/// if present.
pub type FieldCheck = fn(&str, Option<&Value>) -> Result<(), ConfigError>;

/// A named field paired with the check it must pass.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Field name in the config object.
    pub field: &'static str,
    /// Check run against the field value.
    pub check: FieldCheck,
}

impl FieldRule {
    /// Pair a field with a custom check.
    pub const fn new(field: &'static str, check: FieldCheck) -> Self {
        Self { field, check }
    }

    /// Field must be a non-empty string.
    pub const fn required_string(field: &'static str) -> Self {
        Self::new(field, check_required_string)
    }

    /// Field must be a non-empty string naming a file. A value of any other
    /// type is a path error rather than a field error.
    pub const fn key_path(field: &'static str) -> Self {
        Self::new(field, check_key_path)
    }

    /// Field may be absent or null; otherwise it must be a boolean.
    pub const fn optional_bool(field: &'static str) -> Self {
        Self::new(field, check_optional_bool)
    }
}

/// Rules for the push config schema, in check order.
pub fn push_config_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::required_string(fields::KEY_ID),
        FieldRule::required_string(fields::TEAM_ID),
        FieldRule::required_string(fields::BUNDLE_ID),
        FieldRule::required_string(fields::DEVICE_TOKEN),
        FieldRule::key_path(fields::KEY_PATH),
        FieldRule::optional_bool(fields::PRODUCTION),
    ]
}

/// The only way to obtain a [`PushConfig`].
///
/// Runs the ordered field rules, then sanitizes the key path and checks that
/// the key file exists.
///
/// The rules can add constraints but cannot relax the push config schema:
/// `validate` always requires the fields a [`PushConfig`] is built from,
/// whether or not a rule names them.
#[derive(Debug, Clone)]
pub struct ConfigValidator {
    rules: Vec<FieldRule>,
    key_paths: PathSanitizer,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new(push_config_rules())
    }
}

impl ConfigValidator {
    /// Create a validator running `rules` in order before the schema fields
    /// are read.
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self {
            rules,
            key_paths: PathSanitizer::key_files(),
        }
    }

    /// Rules in check order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Run the field rules; the first failure is returned.
    pub fn check_fields(&self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        for rule in &self.rules {
            (rule.check)(rule.field, map.get(rule.field))?;
        }
        Ok(())
    }

    /// Validate an untyped config object and build a trusted config.
    pub fn validate(&self, map: &Map<String, Value>) -> Result<PushConfig, ConfigError> {
        self.check_fields(map)?;

        let key_id = required_str(map, fields::KEY_ID)?;
        let team_id = required_str(map, fields::TEAM_ID)?;
        let bundle_id = required_str(map, fields::BUNDLE_ID)?;
        let device_token = required_str(map, fields::DEVICE_TOKEN)?;
        let raw_key_path = key_path_str(map, fields::KEY_PATH)?;
        let production = optional_bool(map, fields::PRODUCTION)?.unwrap_or(false);

        let key_path = self
            .key_paths
            .sanitize(raw_key_path)
            .map_err(ConfigError::InvalidKeyPath)?;
        if !key_path.is_file() {
            return Err(ConfigError::KeyFileNotFound(key_path));
        }

        debug!(
            "config validated (key_id={}, bundle_id={}, production={})",
            key_id, bundle_id, production
        );
        Ok(PushConfig::new(
            key_id.to_string(),
            team_id.to_string(),
            bundle_id.to_string(),
            device_token.to_string(),
            key_path,
            production,
        ))
    }
}

fn check_required_string(field: &str, value: Option<&Value>) -> Result<(), ConfigError> {
    match value {
        None | Some(Value::Null) => Err(missing_field(field)),
        Some(Value::String(text)) if text.trim().is_empty() => Err(missing_field(field)),
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(invalid_field(field, "expected string")),
    }
}

fn check_key_path(field: &str, value: Option<&Value>) -> Result<(), ConfigError> {
    match value {
        None | Some(Value::Null) | Some(Value::String(_)) => check_required_string(field, value),
        Some(other) => Err(ConfigError::InvalidKeyPath(PathError::Invalid(format!(
            "expected a string path, got {other}"
        )))),
    }
}

fn check_optional_bool(field: &str, value: Option<&Value>) -> Result<(), ConfigError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(()),
        Some(_) => Err(invalid_field(field, "expected boolean")),
    }
}

fn required_str<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a str, ConfigError> {
    check_required_string(field, map.get(field))?;
    map.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field(field))
}

fn key_path_str<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a str, ConfigError> {
    check_key_path(field, map.get(field))?;
    map.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field(field))
}

fn optional_bool(map: &Map<String, Value>, field: &str) -> Result<Option<bool>, ConfigError> {
    check_optional_bool(field, map.get(field))?;
    Ok(map.get(field).and_then(Value::as_bool))
}

fn missing_field(field: &str) -> ConfigError {
    ConfigError::MissingField(field.to_string())
}

fn invalid_field(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}
