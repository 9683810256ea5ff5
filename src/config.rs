//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};

/// Tunables for talking to a bridge.
///
/// The v1 API is always reached over plain HTTP on the local network.
///
/// All fields have defaults, so a partial document deserializes:
///
/// ```
/// use std::time::Duration;
/// use hue_bridge_rs::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{"handshake_timeout_ms": 2500}"#).unwrap();
/// assert_eq!(config.handshake_timeout(), Duration::from_millis(2500));
/// assert_eq!(config.stream_port(), 2100);
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    stream_port: u16,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "handshake_timeout_ms")]
    handshake_timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "request_timeout_ms")]
    request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            stream_port: Self::DEFAULT_STREAM_PORT,
            handshake_timeout: Self::DEFAULT_HANDSHAKE_TIMEOUT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Entertainment streaming port of the bridge.
    pub const DEFAULT_STREAM_PORT: u16 = 2100;
    /// A bridge whose group is not streaming never answers the handshake,
    /// so opening must give up after this long.
    pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream_port(&self) -> u16 {
        self.stream_port
    }

    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn with_stream_port(mut self, port: u16) -> Self {
        self.stream_port = port;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
