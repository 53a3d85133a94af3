//! Error types for the dispatch client.

use pushgate_rs_channel::ChannelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a single send. They never affect later sends.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The signing key could not be read for channel authentication.
    #[error("push notification failed: unable to read key file {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The delivery channel failed to open or send.
    #[error("push notification failed: {0}")]
    Channel(#[source] ChannelError),
}
