//! Shared notification types passed between the dispatch client and
//! delivery channels.

mod delivery;
mod notification;

pub use delivery::{DeliveryReport, DeviceOutcome, SendResult, redact_token};
pub use notification::{
    Alert, AlertBody, DEFAULT_ALERT, DEFAULT_BADGE, DEFAULT_EXPIRY_SECS, DEFAULT_SOUND, Envelope,
    NotificationOptions,
};
