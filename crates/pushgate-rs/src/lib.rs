//! Public SDK surface for Pushgate.
//!
//! This crate re-exports the building blocks and provides small helpers to
//! keep consumer setup consistent.

use pushgate_rs_channel::DeliveryChannel;
use pushgate_rs_config::{ConfigError, RawConfig};
use pushgate_rs_core::DispatchClient;
use std::path::Path;
use std::sync::Arc;

/// Re-export for convenience.
pub use pushgate_rs_channel as channel;
/// Re-export for convenience.
pub use pushgate_rs_config as config;
pub use pushgate_rs_core as core;
/// Re-export for convenience.
pub use pushgate_rs_protocol as protocol;

pub use pushgate_rs_core::{DispatchError, EnvelopeBuilder};

/// Crate version, as reported by the binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate a config assembled in code and return a client sending through
/// `channel`.
pub fn create_sender(
    raw: RawConfig,
    channel: Arc<dyn DeliveryChannel>,
) -> Result<DispatchClient, ConfigError> {
    DispatchClient::from_raw(raw, channel)
}

/// Load a JSON config file and return a client sending through `channel`.
pub fn create_from_config(
    path: impl AsRef<Path>,
    channel: Arc<dyn DeliveryChannel>,
) -> Result<DispatchClient, ConfigError> {
    DispatchClient::from_config_file(path, channel)
}

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
