//! Per-device delivery outcomes and the normalized send result.

use serde::{Deserialize, Serialize};

/// Outcome for a single device as reported by a delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOutcome {
    /// Device token the outcome refers to.
    pub device: String,
    /// Gateway status code, when the channel has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Gateway rejection reason, when the channel has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DeviceOutcome {
    /// Successful delivery to `device`.
    pub fn sent(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            status: None,
            reason: None,
        }
    }

    /// Failed delivery to `device` with a status code and reason.
    pub fn failed(device: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            status: Some(status),
            reason: Some(reason.into()),
        }
    }
}

/// Shorten a device token for log output.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        prefix
    }
}

/// Native result returned by a delivery channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub sent: Vec<DeviceOutcome>,
    pub failed: Vec<DeviceOutcome>,
}

/// Normalized result of one dispatch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    /// True when at least one device accepted the notification.
    pub success: bool,
    pub sent: Vec<DeviceOutcome>,
    pub failed: Vec<DeviceOutcome>,
    /// The channel's report, unmodified.
    pub raw_result: DeliveryReport,
}

impl From<DeliveryReport> for SendResult {
    fn from(report: DeliveryReport) -> Self {
        Self {
            success: !report.sent.is_empty(),
            sent: report.sent.clone(),
            failed: report.failed.clone(),
            raw_result: report,
        }
    }
}
