//! Dry-run channel that logs envelopes instead of transmitting them.

use crate::{ChannelAuth, ChannelError, ChannelHandle, DeliveryChannel, GatewayEnvironment};
use async_trait::async_trait;
use log::{debug, info};
use pushgate_rs_protocol::{DeliveryReport, DeviceOutcome, Envelope, redact_token};
use std::collections::HashMap;
use uuid::Uuid;

/// Channel that accepts every envelope without contacting the gateway.
///
/// Useful for previewing what would be sent. Every device is reported as
/// sent.
#[derive(Debug, Default)]
pub struct DryRunChannel {
    /// Open handles keyed by id.
    state: parking_lot::RwLock<HashMap<Uuid, GatewayEnvironment>>,
}

impl DryRunChannel {
    /// Create a new dry-run channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.state.read().len()
    }
}

#[async_trait]
impl DeliveryChannel for DryRunChannel {
    /// Register a handle. Rejects an empty signing key.
    async fn open(&self, auth: &ChannelAuth) -> Result<ChannelHandle, ChannelError> {
        if auth.key.is_empty() {
            return Err(ChannelError::Auth("signing key is empty".to_string()));
        }
        let handle = ChannelHandle::new();
        self.state.write().insert(handle.id, auth.environment);
        info!(
            "dry-run channel opened (handle_id={}, host={}, key_id={})",
            handle.id,
            auth.environment.host(),
            auth.key_id
        );
        Ok(handle)
    }

    /// Log the envelope and report the device as sent.
    async fn send(
        &self,
        handle: &ChannelHandle,
        envelope: &Envelope,
        device_token: &str,
    ) -> Result<DeliveryReport, ChannelError> {
        let environment = self
            .state
            .read()
            .get(&handle.id)
            .copied()
            .ok_or(ChannelError::UnknownHandle(handle.id))?;
        let body = serde_json::to_string(envelope)
            .map_err(|err| ChannelError::Transport(err.to_string()))?;
        info!(
            "dry-run send (handle_id={}, host={}, device={}, topic={})",
            handle.id,
            environment.host(),
            redact_token(device_token),
            envelope.topic
        );
        debug!("dry-run envelope: {body}");
        Ok(DeliveryReport {
            sent: vec![DeviceOutcome::sent(device_token)],
            failed: Vec::new(),
        })
    }

    /// Forget the handle.
    async fn close(&self, handle: ChannelHandle) {
        info!("dry-run channel closed (handle_id={})", handle.id);
        self.state.write().remove(&handle.id);
    }
}
