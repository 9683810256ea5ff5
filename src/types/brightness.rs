//! Brightness control for Hue lights.

use serde::{Deserialize, Serialize};

/// Brightness level on the bridge's 0-255 scale.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Wraps a raw level on the bridge's scale.
    pub fn create(value: u8) -> Self {
        Brightness { value }
    }

    /// Scales a fraction in `[0, 1]` to `[0, 255]`, rounding to nearest.
    ///
    /// Returns None if the fraction is outside `[0, 1]` or not a number.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Brightness;
    ///
    /// assert_eq!(Brightness::from_fraction(0.0).unwrap().value(), 0);
    /// assert_eq!(Brightness::from_fraction(0.5).unwrap().value(), 128);
    /// assert_eq!(Brightness::from_fraction(1.0).unwrap().value(), 255);
    /// assert!(Brightness::from_fraction(1.5).is_none());
    /// ```
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&fraction) {
            Some(Brightness {
                value: (fraction * 255.0).round() as u8,
            })
        } else {
            None
        }
    }
}
