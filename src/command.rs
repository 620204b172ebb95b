//! Attributes for turning a light on.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, Color, HueSaturation, Kelvin};

/// Attributes to apply when turning a light on.
///
/// Any combination may be set. Brightness is applied independently; of the color
/// attributes only one is applied, in the order color temperature, hue/saturation, RGB.
///
/// # Creating Commands
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use amaran_lights_rs::{Kelvin, TurnOn};
///    let command = TurnOn::from(Kelvin::new(5600));
///    ```
///
/// 2. **Builder pattern** for combining attributes:
///    ```
///    use amaran_lights_rs::{Brightness, Color, TurnOn};
///    let mut command = TurnOn::new();
///    command.brightness(Brightness::create(200)).rgb(Color::rgb(255, 0, 0));
///    assert!(!command.is_empty());
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TurnOn {
    pub(crate) brightness: Option<Brightness>,
    pub(crate) color_temp: Option<Kelvin>,
    pub(crate) hs_color: Option<HueSaturation>,
    pub(crate) rgb_color: Option<Color>,
}

impl TurnOn {
    /// An empty command: just switch on at the stored brightness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no attribute is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use amaran_lights_rs::{Brightness, TurnOn};
    ///
    /// let mut command = TurnOn::new();
    /// assert!(command.is_empty());
    /// command.brightness(Brightness::create(0));
    /// assert!(!command.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none()
            && self.color_temp.is_none()
            && self.hs_color.is_none()
            && self.rgb_color.is_none()
    }

    pub fn brightness(&mut self, brightness: Brightness) -> &mut Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn color_temp(&mut self, kelvin: Kelvin) -> &mut Self {
        self.color_temp = Some(kelvin);
        self
    }

    pub fn hs_color(&mut self, hs: HueSaturation) -> &mut Self {
        self.hs_color = Some(hs);
        self
    }

    pub fn rgb(&mut self, color: Color) -> &mut Self {
        self.rgb_color = Some(color);
        self
    }

    pub fn get_brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn get_color_temp(&self) -> Option<Kelvin> {
        self.color_temp
    }

    pub fn get_hs_color(&self) -> Option<HueSaturation> {
        self.hs_color
    }

    pub fn get_rgb(&self) -> Option<Color> {
        self.rgb_color
    }
}

impl From<Brightness> for TurnOn {
    fn from(brightness: Brightness) -> Self {
        TurnOn {
            brightness: Some(brightness),
            ..Default::default()
        }
    }
}

impl From<Kelvin> for TurnOn {
    fn from(kelvin: Kelvin) -> Self {
        TurnOn {
            color_temp: Some(kelvin),
            ..Default::default()
        }
    }
}

impl From<HueSaturation> for TurnOn {
    fn from(hs: HueSaturation) -> Self {
        TurnOn {
            hs_color: Some(hs),
            ..Default::default()
        }
    }
}

impl From<Color> for TurnOn {
    fn from(color: Color) -> Self {
        TurnOn {
            rgb_color: Some(color),
            ..Default::default()
        }
    }
}
