//! Delivery channel interface and implementations.
//!
//! A delivery channel authenticates against the push gateway and transmits
//! envelopes. The dispatch client opens one handle per send and always closes
//! it afterwards.

pub mod channel;
pub mod error;
pub mod types;

/// Channel error type.
pub use error::ChannelError;
/// Channel trait and the dry-run implementation.
pub use channel::{DeliveryChannel, dry_run::DryRunChannel};
/// Authentication and handle types.
pub use types::{
    ChannelAuth, ChannelHandle, DEFAULT_CONNECTION_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
    GatewayEnvironment,
};
