//! Channel authentication and handle types.

use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Connection timeout handed to channels unless overridden.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Per-request timeout handed to channels unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Push gateway environment selected by the `production` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
    /// Development gateway.
    Sandbox,
    /// Production gateway.
    Production,
}

impl GatewayEnvironment {
    /// Map the config flag onto an environment.
    pub fn from_production(production: bool) -> Self {
        if production {
            GatewayEnvironment::Production
        } else {
            GatewayEnvironment::Sandbox
        }
    }

    /// Gateway host for this environment.
    pub fn host(self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => "api.sandbox.push.apple.com",
            GatewayEnvironment::Production => "api.push.apple.com",
        }
    }
}

/// Credentials and connection settings used to open a channel.
#[derive(Clone)]
pub struct ChannelAuth {
    /// Raw signing key bytes; opaque to the dispatch client.
    pub key: Vec<u8>,
    /// Signing key identifier.
    pub key_id: String,
    /// Developer team identifier.
    pub team_id: String,
    /// Target gateway.
    pub environment: GatewayEnvironment,
    /// Connection establishment timeout.
    pub connection_timeout: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ChannelAuth {
    /// Create auth settings with the default timeouts.
    pub fn new(
        key: Vec<u8>,
        key_id: impl Into<String>,
        team_id: impl Into<String>,
        environment: GatewayEnvironment,
    ) -> Self {
        Self {
            key,
            key_id: key_id.into(),
            team_id: team_id.into(),
            environment,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for ChannelAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelAuth")
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("key_id", &self.key_id)
            .field("team_id", &self.team_id)
            .field("environment", &self.environment)
            .field("connection_timeout", &self.connection_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Handle returned by [`crate::DeliveryChannel::open`].
///
/// Not `Clone`: a handle is owned by exactly one send and consumed by
/// `close`.
#[derive(Debug, PartialEq, Eq)]
pub struct ChannelHandle {
    /// Unique handle id.
    pub id: Uuid,
}

impl ChannelHandle {
    /// Allocate a handle with a fresh id.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for ChannelHandle {
    fn default() -> Self {
        Self::new()
    }
}
