//! Scoped ownership of a delivery channel handle.

use log::{debug, warn};
use pushgate_rs_channel::{ChannelAuth, ChannelError, ChannelHandle, DeliveryChannel};
use pushgate_rs_protocol::{DeliveryReport, Envelope};
use std::sync::Arc;

/// Owns one open channel handle for the duration of a send.
///
/// `release` closes the handle on a spawned task, so the close completes even
/// if the caller stops waiting for it. If the lease is dropped without being
/// released (the send future was cancelled or unwound), the close is spawned
/// from `Drop` instead.
pub(crate) struct ChannelLease {
    channel: Arc<dyn DeliveryChannel>,
    handle: ChannelHandle,
    open: bool,
}

impl ChannelLease {
    /// Open a handle on `channel`. Nothing needs releasing if this fails.
    pub(crate) async fn acquire(
        channel: Arc<dyn DeliveryChannel>,
        auth: &ChannelAuth,
    ) -> Result<Self, ChannelError> {
        let handle = channel.open(auth).await?;
        debug!("channel lease acquired (handle_id={})", handle.id);
        Ok(Self {
            channel,
            handle,
            open: true,
        })
    }

    /// Send through the leased handle.
    pub(crate) async fn send(
        &self,
        envelope: &Envelope,
        device_token: &str,
    ) -> Result<DeliveryReport, ChannelError> {
        self.channel.send(&self.handle, envelope, device_token).await
    }

    /// Close the handle and wait for the close to finish.
    pub(crate) async fn release(mut self) {
        let handle = self.disarm();
        let handle_id = handle.id;
        debug!("channel lease released (handle_id={handle_id})");
        let channel = Arc::clone(&self.channel);
        let close = tokio::spawn(async move { channel.close(handle).await });
        if let Err(err) = close.await {
            warn!("channel close did not complete (handle_id={handle_id}): {err}");
        }
    }

    /// Take the handle out of the lease so `Drop` has nothing left to close.
    fn disarm(&mut self) -> ChannelHandle {
        self.open = false;
        std::mem::take(&mut self.handle)
    }
}

impl Drop for ChannelLease {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        let handle = self.disarm();
        warn!(
            "channel lease dropped before release; closing in background (handle_id={})",
            handle.id
        );
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let channel = Arc::clone(&self.channel);
                runtime.spawn(async move {
                    channel.close(handle).await;
                });
            }
            Err(_) => {
                warn!(
                    "no async runtime to close channel handle (handle_id={})",
                    handle.id
                );
            }
        }
    }
}
