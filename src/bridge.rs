//! The bridge session.

use std::fmt::{self, Display};

use log::{debug, info, warn};
use reqwest::Method;
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::errors::Error;
use crate::frame::{LightUpdate, encode_frame};
use crate::payload::StatePatch;
use crate::response::ResponseKind;
use crate::status::{CommandError, Status};
use crate::stream::{EntertainmentStream, PskIdentity};
use crate::types::{Brightness, Color, PowerMode, TransitionTime};

type Result<T> = std::result::Result<T, Error>;

/// A session with one Hue bridge.
///
/// Command operations consume the session and hand back a new one carrying
/// the outcome, so they chain and never fail outright:
///
/// ```no_run
/// use hue_bridge_rs::{Bridge, Color, Status};
///
/// # async fn run() {
/// let bridge = Bridge::new("192.168.1.20")
///     .with_credentials("my-username", None)
///     .turn_on(1, None)
///     .await
///     .set_color(1, &Color::hsb(46920, 254, 200), None)
///     .await;
///
/// if bridge.status() == Some(Status::Error) {
///     eprintln!("bridge said: {:?}", bridge.error());
/// }
/// # }
/// ```
///
/// Entertainment streaming is separate: [`open_stream`](Bridge::open_stream),
/// [`stream_colors`](Bridge::stream_colors) and
/// [`close_stream`](Bridge::close_stream) return their failures directly.
pub struct Bridge {
    pub(crate) host: String,
    pub(crate) username: Option<String>,
    pub(crate) client_key: Option<String>,
    pub(crate) result: Option<std::result::Result<(), CommandError>>,
    stream: Option<EntertainmentStream>,
    config: ClientConfig,
    http: reqwest::Client,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("client_key", &self.client_key.as_ref().map(|_| "<redacted>"))
            .field("result", &self.result)
            .field("stream", &self.stream)
            .finish()
    }
}

impl Bridge {
    pub fn new(host: &str) -> Self {
        Self::with_config(host, ClientConfig::default())
    }

    pub fn with_config(host: &str, config: ClientConfig) -> Self {
        Bridge {
            host: host.to_string(),
            username: None,
            client_key: None,
            result: None,
            stream: None,
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Attaches credentials from an earlier pairing.
    pub fn with_credentials(mut self, username: &str, client_key: Option<&str>) -> Self {
        self.username = Some(username.to_string());
        self.client_key = client_key.map(String::from);
        self
    }

    /// Creates a session for a known user and checks it against the bridge.
    pub async fn connect(host: &str, username: &str) -> Self {
        Self::new(host).with_credentials(username, None).refresh().await
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn client_key(&self) -> Option<&str> {
        self.client_key.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replaces the config. An open stream keeps the settings it was opened with.
    pub fn set_config(&mut self, config: ClientConfig) {
        self.config = config;
    }

    /// Status of the last command, or None if no command was issued yet.
    pub fn status(&self) -> Option<Status> {
        self.result.as_ref().map(|r| match r {
            Ok(()) => Status::Ok,
            Err(_) => Status::Error,
        })
    }

    /// Error of the last command; present exactly when the status is `error`.
    pub fn error(&self) -> Option<&CommandError> {
        self.result.as_ref().and_then(|r| r.as_ref().err())
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&EntertainmentStream> {
        self.stream.as_ref()
    }

    /// Requests credentials from the bridge. The link button on the bridge
    /// must have been pressed shortly before.
    pub async fn authorize(self, app_name: &str, device_name: &str) -> Self {
        let body = json!({
            "devicetype": format!("{app_name}#{device_name}"),
            "generateclientkey": true,
        });
        let url = format!("http://{}/api/", self.host);
        info!("requesting pairing with bridge {}", self.host);
        self.send_command(Method::POST, &url, Some(&body)).await
    }

    /// Fetches the full bridge state and folds the outcome into the session.
    pub async fn refresh(self) -> Self {
        let url = self.url("");
        self.send_command(Method::GET, &url, None).await
    }

    /// Full bridge state: lights, groups, scenes, config.
    pub async fn info(&self) -> Result<Value> {
        self.query("").await
    }

    pub async fn lights(&self) -> Result<Value> {
        self.query("/lights").await
    }

    pub async fn light(&self, light: impl Display) -> Result<Value> {
        self.query(&format!("/lights/{light}")).await
    }

    pub async fn groups(&self) -> Result<Value> {
        self.query("/groups").await
    }

    pub async fn group(&self, group: impl Display) -> Result<Value> {
        self.query(&format!("/groups/{group}")).await
    }

    pub async fn scenes(&self) -> Result<Value> {
        self.query("/scenes").await
    }

    pub async fn scene(&self, scene: impl Display) -> Result<Value> {
        self.query(&format!("/scenes/{scene}")).await
    }

    pub async fn turn_on(self, light: impl Display, transition: Option<TransitionTime>) -> Self {
        self.set_power(light, PowerMode::On, transition).await
    }

    pub async fn turn_off(self, light: impl Display, transition: Option<TransitionTime>) -> Self {
        self.set_power(light, PowerMode::Off, transition).await
    }

    pub async fn set_power(
        self,
        light: impl Display,
        power: PowerMode,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_state(light, &StatePatch::for_power(power, transition))
            .await
    }

    /// Turns the light on with the given colour.
    pub async fn set_color(
        self,
        light: impl Display,
        color: &Color,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_state(light, &StatePatch::for_color(color, transition))
            .await
    }

    /// Turns the light on at the given brightness.
    pub async fn set_brightness(
        self,
        light: impl Display,
        brightness: &Brightness,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_state(light, &StatePatch::for_brightness(brightness, transition))
            .await
    }

    pub async fn set_state(self, light: impl Display, patch: &StatePatch) -> Self {
        self.put_patch(&format!("/lights/{light}/state"), patch)
            .await
    }

    pub async fn turn_group_on(
        self,
        group: impl Display,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_group_power(group, PowerMode::On, transition).await
    }

    pub async fn turn_group_off(
        self,
        group: impl Display,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_group_power(group, PowerMode::Off, transition).await
    }

    pub async fn set_group_power(
        self,
        group: impl Display,
        power: PowerMode,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_group_state(group, &StatePatch::for_power(power, transition))
            .await
    }

    pub async fn set_group_color(
        self,
        group: impl Display,
        color: &Color,
        transition: Option<TransitionTime>,
    ) -> Self {
        self.set_group_state(group, &StatePatch::for_color(color, transition))
            .await
    }

    pub async fn set_group_brightness(
        self,
        group: impl Display,
        brightness: &Brightness,
        transition: Option<TransitionTime>,
    ) -> Self {
        let patch = StatePatch::for_brightness(brightness, transition);
        self.set_group_state(group, &patch).await
    }

    pub async fn set_group_state(self, group: impl Display, patch: &StatePatch) -> Self {
        self.put_patch(&format!("/groups/{group}/action"), patch)
            .await
    }

    /// Recalls a stored scene on a group.
    pub async fn set_group_scene(self, group: impl Display, scene: &str) -> Self {
        let mut patch = StatePatch::new();
        patch.attr("scene", scene);
        self.set_group_state(group, &patch).await
    }

    /// Opens the entertainment stream using this session's credentials.
    ///
    /// Credentials are validated before any network traffic. An already open
    /// stream is closed first.
    pub async fn open_stream(&mut self) -> Result<()> {
        let username = self
            .username
            .as_deref()
            .ok_or(Error::MissingCredentials("username"))?;
        let client_key = self
            .client_key
            .as_deref()
            .ok_or(Error::MissingCredentials("client key"))?;
        let psk = PskIdentity::new(username, client_key)?;

        if let Some(previous) = self.stream.take() {
            info!(
                "replacing entertainment stream to {}",
                previous.peer_addr()
            );
            if let Err(e) = previous.close().await {
                warn!("closing previous entertainment stream failed: {e}");
            }
        }

        let stream = EntertainmentStream::open(
            &self.host,
            self.config.stream_port(),
            &psk,
            self.config.handshake_timeout(),
        )
        .await?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Encodes and sends one frame on the open stream.
    pub async fn stream_colors(&mut self, updates: &[LightUpdate]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::StreamNotOpen)?;
        stream.send(&encode_frame(updates)).await
    }

    /// Closes the open stream. Closing without an open stream is an error.
    pub async fn close_stream(&mut self) -> Result<()> {
        self.stream.take().ok_or(Error::StreamNotOpen)?.close().await
    }

    fn url(&self, path: &str) -> String {
        format!(
            "http://{}/api/{}{}",
            self.host,
            self.username.as_deref().unwrap_or_default(),
            path
        )
    }

    async fn query(&self, path: &str) -> Result<Value> {
        let body = self.request(Method::GET, &self.url(path), None).await?;
        if let ResponseKind::ApiError(err) = ResponseKind::classify(&body) {
            return Err(Error::Api(err.clone()));
        }
        Ok(body)
    }

    async fn put_patch(self, path: &str, patch: &StatePatch) -> Self {
        let body = match serde_json::to_value(patch) {
            Ok(body) => body,
            Err(e) => return self.apply_failure(CommandError::from(&Error::JsonDump(e))),
        };
        let url = self.url(path);
        self.send_command(Method::PUT, &url, Some(&body)).await
    }

    async fn send_command(self, method: Method, url: &str, body: Option<&Value>) -> Self {
        match self.request(method, url, body).await {
            Ok(response) => self.apply_response(&response),
            Err(e) => self.apply_failure(CommandError::from(&e)),
        }
    }

    async fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
        debug!("{method} {url} {body:?}");
        let mut request = self
            .http
            .request(method, url)
            .timeout(self.config.request_timeout());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| Error::http("send", e))?;
        let text = response.text().await.map_err(|e| Error::http("read", e))?;
        debug!("HTTP response: {text}");
        serde_json::from_str(&text).map_err(Error::JsonLoad)
    }
}
