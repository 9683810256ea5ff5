use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;

/// All error types that can occur when talking to a Hue bridge.
///
/// Ordinary bridge-side failures of command operations are not returned as
/// `Error`; they are folded into the [`crate::Bridge`] status instead. This
/// type covers input validation, streaming failures and the pass-through
/// queries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// The bridge answered with a body that is not valid JSON.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The HTTP exchange with the bridge failed. The message carries the
    /// whole cause chain, e.g. the refused connection or failed lookup.
    #[error("http {action} error: {}", source_chain(.err))]
    Http { action: String, err: reqwest::Error },

    /// The bridge returned a structured `error` object.
    #[error("bridge returned an error: {0}")]
    Api(Value),

    /// Streaming was requested without the credentials produced by pairing.
    #[error("missing {0}; pair with the bridge first")]
    MissingCredentials(&'static str),

    /// The client key is not 32 hex characters.
    #[error("invalid client key: {reason}")]
    InvalidClientKey { reason: String },

    /// The bridge host name could not be resolved.
    #[error("could not resolve host {host}: {err:?}")]
    Resolve { host: String, err: std::io::Error },

    /// A datagram socket operation failed.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// The encrypted datagram layer failed.
    #[error("dtls {action} error: {err}")]
    Dtls {
        action: String,
        err: webrtc_dtls::Error,
    },

    /// The bridge did not complete the handshake in time. This is what a
    /// group without an active entertainment session looks like.
    #[error("dtls handshake with {addr} timed out after {timeout:?}")]
    HandshakeTimeout { addr: SocketAddr, timeout: Duration },

    /// A frame was sent, or a close requested, with no open stream.
    #[error("no entertainment stream is open")]
    StreamNotOpen,
}

impl Error {
    /// Create a new http error
    pub fn http(action: &str, err: reqwest::Error) -> Self {
        Error::Http {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new dtls error
    pub fn dtls(action: &str, err: webrtc_dtls::Error) -> Self {
        Error::Dtls {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new resolve error
    pub fn resolve(host: &str, err: std::io::Error) -> Self {
        Error::Resolve {
            host: host.to_string(),
            err,
        }
    }

    /// Create a new invalid client key error
    pub fn invalid_client_key(reason: impl Into<String>) -> Self {
        Error::InvalidClientKey {
            reason: reason.into(),
        }
    }

    /// True for errors raised before any network attempt.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::MissingCredentials(_) | Error::InvalidClientKey { .. }
        )
    }

    /// True for network, socket and handshake failures.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Error::Http { .. }
                | Error::Resolve { .. }
                | Error::Socket { .. }
                | Error::Dtls { .. }
                | Error::HandshakeTimeout { .. }
                | Error::StreamNotOpen
        )
    }
}

/// Joins an error and all of its sources with `": "`.
fn source_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::invalid_client_key("short").is_input_error());
        assert!(Error::MissingCredentials("username").is_input_error());
        assert!(!Error::StreamNotOpen.is_input_error());

        assert!(Error::StreamNotOpen.is_transport_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        assert!(Error::resolve("bridge.local", io).is_transport_error());
        assert!(!Error::Api(Value::Null).is_transport_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::invalid_client_key("expected 32 hex characters, got 3").to_string(),
            "invalid client key: expected 32 hex characters, got 3"
        );
        assert_eq!(Error::StreamNotOpen, Error::StreamNotOpen);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct Connect(#[source] std::io::Error);

    #[test]
    fn test_source_chain_keeps_root_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        assert_eq!(
            source_chain(&Connect(io)),
            "client error (Connect): connection refused"
        );

        let plain = std::io::Error::other("no route");
        assert_eq!(source_chain(&plain), "no route");
    }
}
