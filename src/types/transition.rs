//! Transition time in the bridge's native unit.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transition time, stored in units of 100 ms.
///
/// Conversions from milliseconds truncate; a remainder below 100 ms is dropped.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::TransitionTime;
///
/// assert_eq!(TransitionTime::from_millis(250).units(), 2);
/// assert_eq!(TransitionTime::from_millis(99).units(), 0);
/// assert_eq!(TransitionTime::from_millis(1000).units(), 10);
/// ```
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTime {
    units: u16,
}

impl TransitionTime {
    const UNIT_MS: u64 = 100;

    pub fn from_millis(millis: u64) -> Self {
        let units = (millis / Self::UNIT_MS).min(u64::from(u16::MAX)) as u16;
        TransitionTime { units }
    }

    pub fn from_units(units: u16) -> Self {
        TransitionTime { units }
    }

    pub fn units(&self) -> u16 {
        self.units
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.units) * Self::UNIT_MS)
    }
}

impl From<Duration> for TransitionTime {
    fn from(duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self::from_millis(millis)
    }
}
