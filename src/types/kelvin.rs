//! Color temperature control.

use serde::{Deserialize, Serialize};

/// Color temperature in Kelvin.
///
/// The valid range depends on the fixture; see [`Kelvin::clamp`].
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Kelvin {
    pub(crate) kelvin: u16,
}

impl Kelvin {
    pub fn new(kelvin: u16) -> Self {
        Kelvin { kelvin }
    }

    /// Get the kelvin value.
    pub fn kelvin(&self) -> u16 {
        self.kelvin
    }

    /// Build from a telemetry reading. Returns None for non-positive or out-of-range values.
    pub fn from_reading(reading: f64) -> Option<Self> {
        (reading > 0.0 && reading <= f64::from(u16::MAX)).then(|| Kelvin {
            kelvin: reading.round() as u16,
        })
    }

    /// Clamp into `[min, max]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use amaran_lights_rs::Kelvin;
    ///
    /// assert_eq!(Kelvin::new(12000).clamp(2000, 10000).kelvin(), 10000);
    /// assert_eq!(Kelvin::new(1500).clamp(2000, 10000).kelvin(), 2000);
    /// assert_eq!(Kelvin::new(5600).clamp(2000, 10000).kelvin(), 5600);
    /// ```
    pub fn clamp(self, min: u16, max: u16) -> Self {
        Kelvin {
            kelvin: self.kelvin.clamp(min, max),
        }
    }

    /// Equivalent mired value.
    pub fn mired(&self) -> Option<u32> {
        (self.kelvin > 0).then(|| 1_000_000 / u32::from(self.kelvin))
    }
}
