//! Brightness on the host scale and intensity on the controller scale.

use serde::{Deserialize, Serialize};

/// Host-facing brightness from 0 to 255.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    pub const MAX: u8 = 255;

    /// Full brightness.
    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn create(value: u8) -> Self {
        Brightness { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Convert to controller intensity, truncating.
    ///
    /// # Examples
    ///
    /// ```
    /// use amaran_lights_rs::Brightness;
    ///
    /// assert_eq!(Brightness::create(255).intensity().value(), 1000);
    /// assert_eq!(Brightness::create(128).intensity().value(), 501);
    /// assert_eq!(Brightness::create(0).intensity().value(), 0);
    /// ```
    pub fn intensity(&self) -> Intensity {
        Intensity {
            value: (u32::from(self.value) * u32::from(Intensity::MAX) / u32::from(Self::MAX)) as u16,
        }
    }
}

impl From<Intensity> for Brightness {
    fn from(intensity: Intensity) -> Self {
        intensity.brightness()
    }
}

/// Controller-native brightness from 0 to 1000.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Intensity {
    pub(crate) value: u16,
}

impl Intensity {
    pub const MAX: u16 = 1000;

    pub fn off() -> Self {
        Intensity { value: 0 }
    }

    /// Returns None above 1000.
    pub fn create(value: u16) -> Option<Self> {
        (value <= Self::MAX).then_some(Intensity { value })
    }

    /// Build from a telemetry reading, clamping into range.
    pub fn from_reading(reading: f64) -> Self {
        Intensity {
            value: reading.clamp(0.0, f64::from(Self::MAX)) as u16,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn is_on(&self) -> bool {
        self.value > 0
    }

    /// Convert to host brightness, rounding to nearest.
    ///
    /// # Examples
    ///
    /// ```
    /// use amaran_lights_rs::Intensity;
    ///
    /// assert_eq!(Intensity::create(500).unwrap().brightness().value(), 128);
    /// assert_eq!(Intensity::create(1000).unwrap().brightness().value(), 255);
    /// assert_eq!(Intensity::create(1).unwrap().brightness().value(), 0);
    /// ```
    pub fn brightness(&self) -> Brightness {
        let scaled = f64::from(self.value) * f64::from(Brightness::MAX) / f64::from(Self::MAX);
        Brightness {
            value: scaled.round() as u8,
        }
    }
}
