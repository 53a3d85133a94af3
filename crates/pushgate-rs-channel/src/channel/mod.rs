//! Delivery channel trait.

use async_trait::async_trait;
use pushgate_rs_protocol::{DeliveryReport, Envelope};

use crate::error::ChannelError;
use crate::types::{ChannelAuth, ChannelHandle};

pub mod dry_run;

/// Transport that authenticates against the push gateway and delivers
/// envelopes.
///
/// Handles are scoped to a single send: callers open, send once and close.
/// Implementations must tolerate concurrent handles on the same channel.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Authenticate and acquire a handle.
    async fn open(&self, auth: &ChannelAuth) -> Result<ChannelHandle, ChannelError>;

    /// Deliver an envelope to a device through an open handle.
    async fn send(
        &self,
        handle: &ChannelHandle,
        envelope: &Envelope,
        device_token: &str,
    ) -> Result<DeliveryReport, ChannelError>;

    /// Release a handle and any connection state behind it.
    async fn close(&self, handle: ChannelHandle);
}
