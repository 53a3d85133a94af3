//! Channel error types.

/// Errors returned by delivery channels.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Gateway rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Transmission to the gateway failed.
    #[error("transport failed: {0}")]
    Transport(String),
    /// Handle was never opened on this channel or is already closed.
    #[error("unknown channel handle: {0}")]
    UnknownHandle(uuid::Uuid),
}
