//! # hue_bridge_rs
//!
//! An async Rust client for Philips Hue bridges.
//!
//! The bridge has two surfaces, and this crate covers both:
//!
//! - the **JSON command API** over HTTP, for pairing, queries and discrete
//!   light/group commands;
//! - **entertainment streaming**, a binary frame protocol over DTLS used to
//!   push per-light colours at a high rate.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hue_bridge_rs::{Bridge, Brightness, Color, LightUpdate, Status, TransitionTime};
//!
//! async fn control() -> Result<(), hue_bridge_rs::Error> {
//!     // Press the link button on the bridge first.
//!     let bridge = Bridge::new("192.168.1.20")
//!         .authorize("my_app", "living_room")
//!         .await;
//!     assert_eq!(bridge.status(), Some(Status::Ok));
//!
//!     let mut bridge = bridge
//!         .set_color(1, &Color::hsb(8000, 200, 254), Some(TransitionTime::from_millis(400)))
//!         .await
//!         .set_brightness(2, &Brightness::from_fraction(0.5).unwrap(), None)
//!         .await;
//!
//!     // Requires an entertainment group activated for streaming.
//!     bridge.open_stream().await?;
//!     bridge.stream_colors(&[LightUpdate::from_rgb8(1, 255, 0, 0)]).await?;
//!     bridge.close_stream().await
//! }
//! ```
//!
//! ## Errors
//!
//! Command operations never fail outright. The bridge reports command
//! errors inside successful HTTP responses, so each command returns a new
//! [`Bridge`] whose [`status`](Bridge::status) and [`error`](Bridge::error)
//! describe the outcome. Streaming operations and queries return
//! [`Error`] directly.
//!
//! ## Communication
//!
//! Commands go to `http://{host}/api/...`. Streaming uses DTLS 1.2 on UDP
//! port 2100 with the pairing username as PSK identity and the client key
//! as PSK.

mod bridge;
mod config;
mod errors;
pub mod frame;
mod payload;
mod response;
mod status;
mod stream;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use config::ClientConfig;
pub use errors::Error;
pub use frame::{LightUpdate, encode_frame};
pub use payload::StatePatch;
pub use response::ResponseKind;
pub use status::{CommandError, Status};
pub use stream::{EntertainmentStream, PskIdentity};
pub use types::{Brightness, Color, PowerMode, TransitionTime};
