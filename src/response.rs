//! Normalization of bridge responses.
//!
//! The bridge signals command failures inside HTTP 200 bodies, so every
//! command goes through [`ResponseKind::classify`] to decide what happened.

use log::{info, warn};
use serde_json::Value;

use crate::bridge::Bridge;
use crate::status::CommandError;

/// What a decoded response body means for the session.
#[derive(Debug, PartialEq)]
pub enum ResponseKind<'a> {
    /// Pairing succeeded; carries the issued credentials.
    Paired {
        username: &'a str,
        client_key: Option<&'a str>,
    },
    /// The first element of the response is an `error` object.
    ApiError(&'a Value),
    /// Anything else, including partial-success arrays and state objects.
    Success,
}

impl<'a> ResponseKind<'a> {
    /// Classifies a decoded response body.
    ///
    /// ```
    /// use serde_json::json;
    /// use hue_bridge_rs::ResponseKind;
    ///
    /// let body = json!([{"error": {"type": 101, "description": "link button not pressed"}}]);
    /// assert!(matches!(ResponseKind::classify(&body), ResponseKind::ApiError(_)));
    ///
    /// let body = json!([{"success": {"/lights/1/state/on": true}}]);
    /// assert_eq!(ResponseKind::classify(&body), ResponseKind::Success);
    /// ```
    pub fn classify(body: &'a Value) -> Self {
        let Some(first) = body.as_array().and_then(|items| items.first()) else {
            return ResponseKind::Success;
        };

        if let Some(err) = first.get("error") {
            return ResponseKind::ApiError(err);
        }

        let credentials = first.get("success").and_then(|success| {
            let username = success.get("username")?.as_str()?;
            let client_key = success.get("clientkey").and_then(Value::as_str);
            Some((username, client_key))
        });

        match credentials {
            Some((username, client_key)) => ResponseKind::Paired {
                username,
                client_key,
            },
            None => ResponseKind::Success,
        }
    }
}

impl Bridge {
    /// Folds a decoded response body into the session.
    ///
    /// Pairing responses fill in the credentials, `error` responses set the
    /// error status and leave the credentials alone, anything else is a
    /// success.
    pub fn apply_response(mut self, body: &Value) -> Self {
        match ResponseKind::classify(body) {
            ResponseKind::Paired {
                username,
                client_key,
            } => {
                info!("paired with bridge {} as {}", self.host(), username);
                self.username = Some(username.to_string());
                if let Some(key) = client_key {
                    self.client_key = Some(key.to_string());
                }
                self.result = Some(Ok(()));
            }
            ResponseKind::ApiError(err) => {
                warn!("bridge {} returned error: {}", self.host(), err);
                self.result = Some(Err(CommandError::Api(err.clone())));
            }
            ResponseKind::Success => {
                self.result = Some(Ok(()));
            }
        }
        self
    }

    /// Records a failure that produced no usable response body.
    pub fn apply_failure(mut self, err: CommandError) -> Self {
        warn!("request to bridge {} failed: {}", self.host(), err);
        self.result = Some(Err(err));
        self
    }
}
