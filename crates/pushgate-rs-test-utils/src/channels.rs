use async_trait::async_trait;
use parking_lot::Mutex;
use pushgate_rs_channel::{ChannelAuth, ChannelError, ChannelHandle, DeliveryChannel};
use pushgate_rs_protocol::{DeliveryReport, DeviceOutcome, Envelope};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub handle_id: Uuid,
    pub envelope: Envelope,
    pub device_token: String,
}

/// Channel that records every call and reports each device as sent.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    opened: AtomicUsize,
    closed: AtomicUsize,
    auths: Mutex<Vec<ChannelAuth>>,
    sends: Mutex<Vec<RecordedSend>>,
    report: Option<DeliveryReport>,
    stall_sends: bool,
    close_delay: Option<Duration>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `report` from every send instead of the default.
    pub fn with_report(mut self, report: DeliveryReport) -> Self {
        self.report = Some(report);
        self
    }

    /// Wait `delay` inside `close` before counting it.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }

    /// Make sends wait forever, for cancellation tests.
    pub fn stalling() -> Self {
        Self {
            stall_sends: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn auths(&self) -> Vec<ChannelAuth> {
        self.auths.lock().clone()
    }

    pub fn sends(&self) -> Vec<RecordedSend> {
        self.sends.lock().clone()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn open(&self, auth: &ChannelAuth) -> Result<ChannelHandle, ChannelError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.auths.lock().push(auth.clone());
        Ok(ChannelHandle::new())
    }

    async fn send(
        &self,
        handle: &ChannelHandle,
        envelope: &Envelope,
        device_token: &str,
    ) -> Result<DeliveryReport, ChannelError> {
        self.sends.lock().push(RecordedSend {
            handle_id: handle.id,
            envelope: envelope.clone(),
            device_token: device_token.to_string(),
        });
        if self.stall_sends {
            std::future::pending::<()>().await;
        }
        Ok(self.report.clone().unwrap_or_else(|| DeliveryReport {
            sent: vec![DeviceOutcome::sent(device_token)],
            failed: Vec::new(),
        }))
    }

    async fn close(&self, _handle: ChannelHandle) {
        if let Some(delay) = self.close_delay {
            tokio::time::sleep(delay).await;
        }
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Where a [`FailingChannel`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Open,
    Send,
    /// Panic inside `send`.
    Panic,
}

#[derive(Debug)]
pub struct FailingChannel {
    fail_at: FailAt,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl FailingChannel {
    pub fn new(fail_at: FailAt) -> Self {
        Self {
            fail_at,
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryChannel for FailingChannel {
    async fn open(&self, _auth: &ChannelAuth) -> Result<ChannelHandle, ChannelError> {
        if self.fail_at == FailAt::Open {
            return Err(ChannelError::Auth("invalid provider token".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ChannelHandle::new())
    }

    async fn send(
        &self,
        _handle: &ChannelHandle,
        _envelope: &Envelope,
        _device_token: &str,
    ) -> Result<DeliveryReport, ChannelError> {
        match self.fail_at {
            FailAt::Panic => panic!("channel panicked during send"),
            _ => Err(ChannelError::Transport("gateway unavailable".to_string())),
        }
    }

    async fn close(&self, _handle: ChannelHandle) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
