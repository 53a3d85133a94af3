//! Envelope construction and the dispatch client.

pub mod client;
pub mod envelope;
pub mod error;
mod lease;

/// Dispatch client bound to one validated config.
pub use client::DispatchClient;
/// Envelope construction with defaults.
pub use envelope::EnvelopeBuilder;
/// Per-call dispatch error.
pub use error::DispatchError;
