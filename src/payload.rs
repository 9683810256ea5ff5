//! State patches for lights and groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Brightness, Color, PowerMode, TransitionTime};

/// A partial light or group state to send to the bridge.
///
/// Only the attributes that were set are serialized. Arbitrary attributes the
/// typed setters do not cover can be added with [`StatePatch::attr`].
///
/// ```
/// use hue_bridge_rs::{Color, StatePatch, TransitionTime};
///
/// let mut patch = StatePatch::new();
/// patch.color(&Color::hsb(46920, 254, 200));
/// patch.transition(&TransitionTime::from_millis(400));
///
/// let body = serde_json::to_value(&patch).unwrap();
/// assert_eq!(body["hue"], 46920);
/// assert_eq!(body["transitiontime"], 4);
/// assert!(body.get("xy").is_none());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatePatch {
    pub(crate) on: Option<bool>,
    pub(crate) bri: Option<u8>,
    pub(crate) hue: Option<u16>,
    pub(crate) sat: Option<u8>,
    pub(crate) xy: Option<[f64; 2]>,
    pub(crate) ct: Option<u16>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition: Option<u16>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.on.is_none()
            && self.bri.is_none()
            && self.hue.is_none()
            && self.sat.is_none()
            && self.xy.is_none()
            && self.ct.is_none()
            && self.transition.is_none()
            && self.extra.is_empty()
    }

    pub fn power(&mut self, power: PowerMode) -> &mut Self {
        self.on = Some(power.is_on());
        self
    }

    pub fn brightness(&mut self, brightness: &Brightness) -> &mut Self {
        self.bri = Some(brightness.value);
        self
    }

    /// Sets the colour, clearing whatever the other colour space had set.
    pub fn color(&mut self, color: &Color) -> &mut Self {
        match *color {
            Color::Hsb { hue, sat, bri } => {
                self.hue = Some(hue);
                self.sat = Some(sat);
                self.bri = Some(bri);
                self.xy = None;
            }
            Color::Xy { x, y } => {
                self.xy = Some([x, y]);
                self.hue = None;
                self.sat = None;
                self.bri = None;
            }
        }
        self
    }

    /// Colour temperature in mireds.
    pub fn ct(&mut self, mireds: u16) -> &mut Self {
        self.ct = Some(mireds);
        self
    }

    pub fn transition(&mut self, transition: &TransitionTime) -> &mut Self {
        self.transition = Some(transition.units());
        self
    }

    /// Sets an attribute by name, e.g. `alert` or `effect`.
    pub fn attr(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn with_transition(mut self, transition: Option<TransitionTime>) -> Self {
        if let Some(t) = transition {
            self.transition(&t);
        }
        self
    }

    pub(crate) fn for_power(power: PowerMode, transition: Option<TransitionTime>) -> Self {
        let mut patch = Self::new();
        patch.power(power);
        patch.with_transition(transition)
    }

    pub(crate) fn for_color(color: &Color, transition: Option<TransitionTime>) -> Self {
        let mut patch = Self::new();
        patch.power(PowerMode::On).color(color);
        patch.with_transition(transition)
    }

    pub(crate) fn for_brightness(
        brightness: &Brightness,
        transition: Option<TransitionTime>,
    ) -> Self {
        let mut patch = Self::new();
        patch.power(PowerMode::On).brightness(brightness);
        patch.with_transition(transition)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_patch() {
        let patch = StatePatch::new();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }

    #[test]
    fn test_hsb_color_patch() {
        let patch = StatePatch::for_color(&Color::hsb(10000, 200, 150), None);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"on": true, "hue": 10000, "sat": 200, "bri": 150})
        );
    }

    #[test]
    fn test_xy_color_patch() {
        let color = Color::xy(0.5, 0.25).unwrap();
        let patch = StatePatch::for_color(&color, None);
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, json!({"on": true, "xy": [0.5, 0.25]}));
        for key in ["hue", "sat", "bri"] {
            assert!(body.get(key).is_none());
        }
    }

    #[test]
    fn test_color_switch_clears_other_space() {
        let mut patch = StatePatch::new();
        patch.color(&Color::hsb(1, 2, 3));
        patch.color(&Color::xy(0.1, 0.2).unwrap());
        assert_eq!(patch.hue, None);
        assert_eq!(patch.bri, None);
        assert_eq!(patch.xy, Some([0.1, 0.2]));

        patch.color(&Color::hsb(1, 2, 3));
        assert_eq!(patch.xy, None);
    }

    #[test]
    fn test_transition_units() {
        let patch = StatePatch::for_power(PowerMode::Off, Some(TransitionTime::from_millis(250)));
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"on": false, "transitiontime": 2})
        );
    }

    #[test]
    fn test_brightness_patch() {
        let bri = Brightness::from_fraction(0.5).unwrap();
        let patch = StatePatch::for_brightness(&bri, None);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"on": true, "bri": 128})
        );
    }

    #[test]
    fn test_extra_attributes() {
        let mut patch = StatePatch::new();
        patch.attr("alert", "select").ct(366);
        assert!(!patch.is_empty());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"ct": 366, "alert": "select"})
        );
    }
}
