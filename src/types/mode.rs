//! Color modes.

use serde::{Deserialize, Serialize};

/// The color mode a light is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColorMode {
    /// Intensity only, no color value
    #[default]
    Brightness,
    /// White at a color temperature
    ColorTemp,
    /// Hue and saturation
    HueSat,
    /// Red, green and blue channels
    Rgb,
}

/// What a device can be driven with, fixed at construction.
///
/// A device supports exactly one of these; color temperature takes precedence over
/// hue/saturation, which takes precedence over RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedMode {
    /// Switch only
    OnOff,
    /// Dimmable, no color control
    Brightness,
    ColorTemp,
    HueSat,
    Rgb,
}

impl SupportedMode {
    /// The color mode telemetry is polled for, if any.
    pub fn color_mode(&self) -> Option<ColorMode> {
        match self {
            SupportedMode::OnOff | SupportedMode::Brightness => None,
            SupportedMode::ColorTemp => Some(ColorMode::ColorTemp),
            SupportedMode::HueSat => Some(ColorMode::HueSat),
            SupportedMode::Rgb => Some(ColorMode::Rgb),
        }
    }

    /// The mode a freshly constructed light reports.
    pub fn initial_color_mode(&self) -> ColorMode {
        self.color_mode().unwrap_or(ColorMode::Brightness)
    }

    pub fn supports(&self, mode: ColorMode) -> bool {
        match mode {
            ColorMode::Brightness => !matches!(self, SupportedMode::OnOff),
            other => self.color_mode() == Some(other),
        }
    }

    pub fn is_dimmable(&self) -> bool {
        !matches!(self, SupportedMode::OnOff)
    }
}
