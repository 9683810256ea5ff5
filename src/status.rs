//! Outcome of the last command issued through a bridge session.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::errors::Error;

/// Status of the last command sent to the bridge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Why the last command failed.
///
/// The bridge reports command failures inside an HTTP 200 body, so an
/// [`Api`](CommandError::Api) error carries the opaque `error` object as sent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// The bridge answered with an `error` object.
    #[error("bridge error: {0}")]
    Api(Value),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("decode error: {0}")]
    Decode(String),
}

impl CommandError {
    /// Numeric error type of an API error, e.g. `1` for "unauthorized user".
    pub fn api_type(&self) -> Option<u64> {
        match self {
            CommandError::Api(err) => err.get("type").and_then(Value::as_u64),
            _ => None,
        }
    }

    /// Human-readable description of an API error.
    pub fn description(&self) -> Option<&str> {
        match self {
            CommandError::Api(err) => err.get("description").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl From<&Error> for CommandError {
    fn from(err: &Error) -> Self {
        match err {
            Error::JsonLoad(e) | Error::JsonDump(e) => CommandError::Decode(e.to_string()),
            Error::Api(value) => CommandError::Api(value.clone()),
            other => CommandError::Transport(other.to_string()),
        }
    }
}
