//! Notification options supplied by callers and the envelope handed to channels.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Seconds added to the current time when the caller does not set an expiry.
pub const DEFAULT_EXPIRY_SECS: u64 = 3600;
/// Badge count used when the caller does not set one.
pub const DEFAULT_BADGE: u32 = 1;
/// Sound name used when the caller does not set one.
pub const DEFAULT_SOUND: &str = "ping.aiff";
/// Alert text used when the caller does not set one.
pub const DEFAULT_ALERT: &str = "Push Notification";

/// Alert shown to the user: plain text or a structured title/body pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alert {
    /// Single line of alert text.
    Text(String),
    /// Structured alert with optional title, subtitle and body.
    Structured(AlertBody),
}

/// Structured alert fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl From<&str> for Alert {
    fn from(text: &str) -> Self {
        Alert::Text(text.to_string())
    }
}

impl From<String> for Alert {
    fn from(text: String) -> Self {
        Alert::Text(text)
    }
}

impl From<AlertBody> for Alert {
    fn from(body: AlertBody) -> Self {
        Alert::Structured(body)
    }
}

/// Caller-supplied overrides for a single notification. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    #[serde(default)]
    pub alert: Option<Alert>,
    #[serde(default)]
    pub badge: Option<u32>,
    #[serde(default)]
    pub sound: Option<String>,
    /// Lifetime of the notification in seconds, relative to the send time.
    #[serde(default)]
    pub expiry: Option<u64>,
    #[serde(default)]
    pub priority: Option<u8>,
    /// Accepted for compatibility; the envelope topic always comes from config.
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub collapse_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl NotificationOptions {
    /// Create empty options (all defaults apply).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert.
    pub fn alert(mut self, alert: impl Into<Alert>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    /// Set the badge count.
    pub fn badge(mut self, badge: u32) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Set the sound name.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Set the expiry window in seconds.
    pub fn expiry(mut self, seconds: u64) -> Self {
        self.expiry = Some(seconds);
        self
    }

    /// Set the delivery priority.
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the collapse identifier.
    pub fn collapse_id(mut self, collapse_id: impl Into<String>) -> Self {
        self.collapse_id = Some(collapse_id.into());
        self
    }

    /// Set the thread identifier.
    pub fn thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// Dispatch-ready notification built fresh for every send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Absolute expiry as seconds since the Unix epoch.
    pub expiry: i64,
    pub badge: u32,
    pub sound: String,
    pub alert: Alert,
    /// Always the configured bundle id.
    pub topic: String,
    /// Caller payload, passed through untouched.
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}
