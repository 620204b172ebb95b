//! Hue and Saturation color representation.

use serde::{Deserialize, Serialize};

/// Hue and Saturation color representation.
///
/// - Hue: The color angle on the color wheel (0-360 degrees)
/// - Saturation: The intensity of the color (0-100 percent)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueSaturation {
    hue: u16,
    saturation: u8,
}

impl HueSaturation {
    /// Create a new HueSaturation with the given values.
    ///
    /// Returns `None` if values are outside valid ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use amaran_lights_rs::HueSaturation;
    ///
    /// assert!(HueSaturation::create(0, 100).is_some());   // Red at full saturation
    /// assert!(HueSaturation::create(120, 50).is_some()); // Green at 50% saturation
    /// assert!(HueSaturation::create(361, 50).is_none()); // Invalid hue
    /// assert!(HueSaturation::create(180, 101).is_none()); // Invalid saturation
    /// ```
    pub fn create(hue: u16, saturation: u8) -> Option<Self> {
        if hue <= 360 && saturation <= 100 {
            Some(HueSaturation { hue, saturation })
        } else {
            None
        }
    }

    /// Build from telemetry readings, truncating fractional parts.
    pub fn from_reading(hue: f64, saturation: f64) -> Option<Self> {
        if !(0.0..=360.0).contains(&hue) || !(0.0..=100.0).contains(&saturation) {
            return None;
        }
        Self::create(hue as u16, saturation as u8)
    }

    /// Get the hue value.
    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Get the saturation value.
    pub fn saturation(&self) -> u8 {
        self.saturation
    }
}
