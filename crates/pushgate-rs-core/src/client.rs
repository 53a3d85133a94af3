//! Dispatch client: one validated config, one delivery channel.

use crate::envelope::EnvelopeBuilder;
use crate::error::DispatchError;
use crate::lease::ChannelLease;
use log::{debug, info, warn};
use pushgate_rs_channel::{
    ChannelAuth, DEFAULT_CONNECTION_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DeliveryChannel,
    GatewayEnvironment,
};
use pushgate_rs_config::{ConfigError, PushConfig, RawConfig};
use pushgate_rs_protocol::{NotificationOptions, SendResult, redact_token};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Sends notifications for a single validated config.
///
/// The client holds no per-send state; concurrent `send` calls each acquire
/// and release their own channel handle.
pub struct DispatchClient {
    config: PushConfig,
    channel: Arc<dyn DeliveryChannel>,
    envelopes: EnvelopeBuilder,
    connection_timeout: Duration,
    request_timeout: Duration,
}

impl DispatchClient {
    /// Create a client from an already validated config.
    pub fn new(config: PushConfig, channel: Arc<dyn DeliveryChannel>) -> Self {
        Self {
            config,
            channel,
            envelopes: EnvelopeBuilder::default(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Validate a config assembled in code and create a client.
    pub fn from_raw(
        raw: RawConfig,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(PushConfig::from_raw(raw)?, channel))
    }

    /// Load and validate a JSON config file and create a client.
    pub fn from_config_file(
        path: impl AsRef<Path>,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(PushConfig::load_from_path(path)?, channel))
    }

    /// Replace the envelope builder (e.g. to pin the clock).
    pub fn with_envelope_builder(mut self, envelopes: EnvelopeBuilder) -> Self {
        self.envelopes = envelopes;
        self
    }

    /// Override the channel timeouts.
    pub fn with_timeouts(mut self, connection: Duration, request: Duration) -> Self {
        self.connection_timeout = connection;
        self.request_timeout = request;
        self
    }

    /// The validated config this client sends with.
    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Build an envelope and deliver it to the configured device.
    ///
    /// The channel handle is released on every exit path. Failures are not
    /// retried.
    pub async fn send(
        &self,
        payload: Value,
        options: &NotificationOptions,
    ) -> Result<SendResult, DispatchError> {
        let envelope = self.envelopes.build(&self.config, payload, options);
        let auth = self.channel_auth().await?;
        debug!(
            "dispatching notification (topic={}, device={}, expiry={})",
            envelope.topic,
            redact_token(self.config.device_token()),
            envelope.expiry
        );

        let lease = ChannelLease::acquire(Arc::clone(&self.channel), &auth)
            .await
            .map_err(DispatchError::Channel)?;
        let outcome = lease.send(&envelope, self.config.device_token()).await;
        lease.release().await;

        let report = match outcome {
            Ok(report) => report,
            Err(err) => {
                warn!("notification dispatch failed: {err}");
                return Err(DispatchError::Channel(err));
            }
        };
        let result = SendResult::from(report);
        info!(
            "notification dispatched (sent={}, failed={})",
            result.sent.len(),
            result.failed.len()
        );
        Ok(result)
    }

    /// Send an arbitrary custom payload. Same behavior as [`Self::send`].
    pub async fn send_custom(
        &self,
        payload: Value,
        options: &NotificationOptions,
    ) -> Result<SendResult, DispatchError> {
        self.send(payload, options).await
    }

    /// Read the signing key and assemble channel credentials.
    async fn channel_auth(&self) -> Result<ChannelAuth, DispatchError> {
        let path = self.config.key_path();
        let key = tokio::fs::read(path)
            .await
            .map_err(|source| DispatchError::KeyRead {
                path: path.to_path_buf(),
                source,
            })?;
        let mut auth = ChannelAuth::new(
            key,
            self.config.key_id(),
            self.config.team_id(),
            GatewayEnvironment::from_production(self.config.production()),
        );
        auth.connection_timeout = self.connection_timeout;
        auth.request_timeout = self.request_timeout;
        Ok(auth)
    }
}

impl fmt::Debug for DispatchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchClient")
            .field("config", &self.config)
            .field("envelopes", &self.envelopes)
            .field("connection_timeout", &self.connection_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
