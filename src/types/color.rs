//! Colour for the JSON command API.

use serde::{Deserialize, Serialize};

/// A light colour in one of the two colour spaces the bridge accepts.
///
/// The variants are mutually exclusive; a command carries either
/// hue/saturation/brightness or CIE xy, never both.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Hue (0-65535), saturation (0-255) and brightness (0-255).
    Hsb { hue: u16, sat: u8, bri: u8 },
    /// CIE 1931 chromaticity, each coordinate in `[0, 0.8]`.
    Xy { x: f64, y: f64 },
}

impl Color {
    const XY_MAX: f64 = 0.8;

    pub fn hsb(hue: u16, sat: u8, bri: u8) -> Self {
        Color::Hsb { hue, sat, bri }
    }

    /// Returns None if either coordinate is outside `[0, 0.8]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Color;
    ///
    /// assert!(Color::xy(0.3227, 0.329).is_some());
    /// assert!(Color::xy(0.9, 0.1).is_none());
    /// assert!(Color::xy(-0.1, 0.1).is_none());
    /// ```
    pub fn xy(x: f64, y: f64) -> Option<Self> {
        let range = 0.0..=Self::XY_MAX;
        if range.contains(&x) && range.contains(&y) {
            Some(Color::Xy { x, y })
        } else {
            None
        }
    }
}
