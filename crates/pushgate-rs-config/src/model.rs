//! Configuration models: the untrusted input form and the validated config.

use crate::validator::fields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Validated push configuration.
///
/// Only [`crate::ConfigValidator`] can construct this type, so every instance
/// carries a sanitized key path that pointed at an existing file when it was
/// validated. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConfig {
    key_id: String,
    team_id: String,
    bundle_id: String,
    device_token: String,
    key_path: PathBuf,
    production: bool,
}

impl PushConfig {
    pub(crate) fn new(
        key_id: String,
        team_id: String,
        bundle_id: String,
        device_token: String,
        key_path: PathBuf,
        production: bool,
    ) -> Self {
        Self {
            key_id,
            team_id,
            bundle_id,
            device_token,
            key_path,
            production,
        }
    }

    /// Signing key identifier.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Developer team identifier.
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// App bundle id, used as the notification topic.
    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    /// Target device token.
    pub fn device_token(&self) -> &str {
        &self.device_token
    }

    /// Absolute, sanitized path to the signing key.
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Whether to target the production gateway instead of the sandbox.
    pub fn production(&self) -> bool {
        self.production
    }
}

/// Untrusted configuration assembled in code.
///
/// This is a convenience over building a JSON map by hand; it is converted to
/// the same map that a config file produces and validated the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub device_token: Option<String>,
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub production: Option<bool>,
}

impl RawConfig {
    /// Convert into the untyped map consumed by the validator. Unset fields
    /// are omitted.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        let strings = [
            (fields::KEY_ID, self.key_id),
            (fields::TEAM_ID, self.team_id),
            (fields::BUNDLE_ID, self.bundle_id),
            (fields::DEVICE_TOKEN, self.device_token),
            (fields::KEY_PATH, self.key_path),
        ];
        for (field, value) in strings {
            if let Some(value) = value {
                map.insert(field.to_string(), Value::String(value));
            }
        }
        if let Some(production) = self.production {
            map.insert(fields::PRODUCTION.to_string(), Value::Bool(production));
        }
        map
    }
}
