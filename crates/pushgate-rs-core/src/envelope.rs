//! Envelope construction from config, payload and caller options.

use chrono::{DateTime, Utc};
use log::debug;
use pushgate_rs_config::PushConfig;
use pushgate_rs_protocol::{
    Alert, DEFAULT_ALERT, DEFAULT_BADGE, DEFAULT_EXPIRY_SECS, DEFAULT_SOUND, Envelope,
    NotificationOptions,
};
use serde_json::Value;

/// Source of the current time.
pub type Clock = fn() -> DateTime<Utc>;

/// Merges caller options with defaults into a dispatch-ready envelope.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeBuilder {
    clock: Clock,
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self { clock: Utc::now }
    }
}

impl EnvelopeBuilder {
    /// Builder using the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using a custom clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Build an envelope. The topic is always the configured bundle id and
    /// the payload is passed through untouched.
    pub fn build(
        &self,
        config: &PushConfig,
        payload: Value,
        options: &NotificationOptions,
    ) -> Envelope {
        if let Some(topic) = options
            .topic
            .as_deref()
            .filter(|topic| *topic != config.bundle_id())
        {
            debug!(
                "ignoring caller topic override (requested={}, topic={})",
                topic,
                config.bundle_id()
            );
        }

        let lifetime = options.expiry.unwrap_or(DEFAULT_EXPIRY_SECS);
        let lifetime = i64::try_from(lifetime).unwrap_or(i64::MAX);
        let expiry = (self.clock)().timestamp().saturating_add(lifetime);

        Envelope {
            expiry,
            badge: options.badge.unwrap_or(DEFAULT_BADGE),
            sound: options
                .sound
                .clone()
                .unwrap_or_else(|| DEFAULT_SOUND.to_string()),
            alert: options
                .alert
                .clone()
                .unwrap_or_else(|| Alert::Text(DEFAULT_ALERT.to_string())),
            topic: config.bundle_id().to_string(),
            payload,
            priority: options.priority,
            collapse_id: options.collapse_id.clone(),
            thread_id: options.thread_id.clone(),
        }
    }
}
