//! Entertainment streaming frame encoding.
//!
//! A frame is a 16-byte header followed by one 9-byte record per light:
//!
//! ```text
//! "HueStream" | 01 00 | seq | 00 00 | color space | 00
//! device type | light id (u16) | channel 1 | channel 2 | channel 3   (repeated)
//! ```
//!
//! All multi-byte fields are big-endian.

use bytes::{BufMut, Bytes, BytesMut};

pub const PROTOCOL_NAME: &[u8; 9] = b"HueStream";
pub const HEADER_LEN: usize = 16;
pub const RECORD_LEN: usize = 9;

const VERSION_MAJOR: u8 = 0x01;
const VERSION_MINOR: u8 = 0x00;
const SEQUENCE_ID: u8 = 0x00;
const COLOR_SPACE_RGB: u8 = 0x00;
const DEVICE_TYPE_LIGHT: u8 = 0x00;

/// Colour for one light in a streaming frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightUpdate {
    pub light_id: u16,
    pub channels: [u16; 3],
}

impl LightUpdate {
    pub fn new(light_id: u16, channel1: u16, channel2: u16, channel3: u16) -> Self {
        LightUpdate {
            light_id,
            channels: [channel1, channel2, channel3],
        }
    }

    /// Widens 8-bit RGB to the 16-bit channel range.
    ///
    /// ```
    /// use hue_bridge_rs::LightUpdate;
    ///
    /// let update = LightUpdate::from_rgb8(3, 255, 128, 0);
    /// assert_eq!(update.channels, [65535, 32896, 0]);
    /// ```
    pub fn from_rgb8(light_id: u16, red: u8, green: u8, blue: u8) -> Self {
        let widen = |c: u8| u16::from(c) * 257;
        Self::new(light_id, widen(red), widen(green), widen(blue))
    }
}

/// Encodes one streaming frame. Records keep the order given; duplicate
/// light ids are written as-is.
pub fn encode_frame(updates: &[LightUpdate]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + RECORD_LEN * updates.len());

    buf.put_slice(PROTOCOL_NAME);
    buf.put_u8(VERSION_MAJOR);
    buf.put_u8(VERSION_MINOR);
    buf.put_u8(SEQUENCE_ID);
    buf.put_u16(0);
    buf.put_u8(COLOR_SPACE_RGB);
    buf.put_u8(0);

    for update in updates {
        buf.put_u8(DEVICE_TYPE_LIGHT);
        buf.put_u16(update.light_id);
        for channel in update.channels {
            buf.put_u16(channel);
        }
    }

    buf.freeze()
}
