//! Light state tracking.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode;
use crate::types::{Brightness, Color, ColorMode, HueSaturation, Intensity, Kelvin, PowerMode};

/// The single color value a light holds.
///
/// Storing one variant replaces whatever was there, so a light can never report a color
/// temperature and an RGB triple at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorValue {
    Temp(Kelvin),
    HueSat(HueSaturation),
    Rgb(Color),
}

impl ColorValue {
    pub fn mode(&self) -> ColorMode {
        match self {
            ColorValue::Temp(_) => ColorMode::ColorTemp,
            ColorValue::HueSat(_) => ColorMode::HueSat,
            ColorValue::Rgb(_) => ColorMode::Rgb,
        }
    }
}

/// Tracks the last known settings for a light.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightState {
    power: PowerMode,
    brightness: Option<Brightness>,
    color_mode: ColorMode,
    color: Option<ColorValue>,
}

impl LightState {
    /// A light that is off at full stored brightness, in the given mode.
    pub fn new(color_mode: ColorMode) -> Self {
        LightState {
            power: PowerMode::Off,
            brightness: Some(Brightness::new()),
            color_mode,
            color: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.power.is_on()
    }

    pub fn power(&self) -> PowerMode {
        self.power
    }

    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn color(&self) -> Option<&ColorValue> {
        self.color.as_ref()
    }

    /// The color temperature, if that is the stored color.
    pub fn color_temp(&self) -> Option<Kelvin> {
        match self.color {
            Some(ColorValue::Temp(k)) if k.kelvin() > 0 => Some(k),
            _ => None,
        }
    }

    /// The hue/saturation pair, if that is the stored color.
    pub fn hs_color(&self) -> Option<HueSaturation> {
        match self.color {
            Some(ColorValue::HueSat(hs)) => Some(hs),
            _ => None,
        }
    }

    /// The RGB triple, if that is the stored color.
    pub fn rgb_color(&self) -> Option<Color> {
        match self.color {
            Some(ColorValue::Rgb(c)) => Some(c),
            _ => None,
        }
    }

    /// Intensity to send when (re)asserting the current brightness.
    ///
    /// Full intensity if brightness is zero or unknown.
    pub fn on_intensity(&self) -> Intensity {
        match self.brightness {
            Some(b) if !b.is_zero() => b.intensity(),
            _ => Brightness::new().intensity(),
        }
    }

    /// Apply an `get_intensity` payload.
    ///
    /// Returns false and leaves the state untouched if no intensity could be decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use amaran_lights_rs::{ColorMode, LightState};
    ///
    /// let mut state = LightState::new(ColorMode::Brightness);
    /// assert!(state.apply_intensity(&json!(500)));
    /// assert_eq!(state.brightness().unwrap().value(), 128);
    /// assert!(state.is_on());
    /// ```
    pub fn apply_intensity(&mut self, data: &Value) -> bool {
        let Some(reading) = decode::scalar(data, "intensity") else {
            warn!("Unexpected intensity data: {data}");
            return false;
        };
        let intensity = Intensity::from_reading(reading);
        self.brightness = Some(intensity.brightness());
        self.power = PowerMode::from(reading > 0.0);
        true
    }

    /// Try to resolve `mode` from a telemetry payload and store it.
    ///
    /// Returns false and leaves the state untouched if the payload has no usable value.
    pub fn apply_color(&mut self, mode: ColorMode, data: &Value) -> bool {
        let value = match mode {
            ColorMode::ColorTemp => decode::scalar(data, "cct")
                .and_then(Kelvin::from_reading)
                .map(ColorValue::Temp),
            ColorMode::HueSat => decode::hue_sat(data).map(ColorValue::HueSat),
            ColorMode::Rgb => decode::rgb(data).map(ColorValue::Rgb),
            ColorMode::Brightness => return false,
        };

        match value {
            Some(value) => {
                self.set_color(value);
                true
            }
            None => {
                warn!("Unexpected {mode:?} data: {data}");
                false
            }
        }
    }

    /// Resolve the color mode from a set of polled payloads.
    ///
    /// `candidates` are tried in order and the first that resolves wins. If none resolves,
    /// the mode and stored color are left as they were. Returns the resolved mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use amaran_lights_rs::{ColorMode, LightState};
    ///
    /// let mut state = LightState::new(ColorMode::ColorTemp);
    /// let resolved = state.reconcile_color([(ColorMode::ColorTemp, json!({"cct": 5600}))]);
    /// assert_eq!(resolved, Some(ColorMode::ColorTemp));
    /// assert_eq!(state.color_temp().unwrap().kelvin(), 5600);
    /// ```
    pub fn reconcile_color<I>(&mut self, candidates: I) -> Option<ColorMode>
    where
        I: IntoIterator<Item = (ColorMode, Value)>,
    {
        for (mode, data) in candidates {
            if self.apply_color(mode, &data) {
                return Some(mode);
            }
        }
        debug!("No color mode resolved, keeping {:?}", self.color_mode);
        None
    }

    pub(crate) fn set_power(&mut self, power: PowerMode) {
        self.power = power;
    }

    pub(crate) fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = Some(brightness);
    }

    pub(crate) fn set_color(&mut self, value: ColorValue) {
        self.color_mode = value.mode();
        self.color = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rgb_state() -> LightState {
        let mut state = LightState::new(ColorMode::Rgb);
        state.set_color(ColorValue::Rgb(Color::rgb(10, 20, 30)));
        state.set_brightness(Brightness::create(40));
        state.set_power(PowerMode::On);
        state
    }

    #[test]
    fn test_intensity_from_scalar_and_mapping() {
        let mut state = LightState::new(ColorMode::Brightness);
        assert!(state.apply_intensity(&json!(500)));
        assert_eq!(state.brightness(), Some(Brightness::create(128)));
        assert_eq!(state.power(), PowerMode::On);

        assert!(state.apply_intensity(&json!({"intensity": 0})));
        assert_eq!(state.brightness(), Some(Brightness::create(0)));
        assert!(!state.is_on());
    }

    #[test]
    fn test_unusable_intensity_keeps_state() {
        let mut state = rgb_state();
        let before = state.clone();
        assert!(!state.apply_intensity(&json!({"status": "busy"})));
        assert!(!state.apply_intensity(&json!(null)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_cct_clears_other_colors() {
        let mut state = rgb_state();
        let resolved = state.reconcile_color([(ColorMode::ColorTemp, json!({"cct": 5600}))]);

        assert_eq!(resolved, Some(ColorMode::ColorTemp));
        assert_eq!(state.color_mode(), ColorMode::ColorTemp);
        assert_eq!(state.color_temp(), Some(Kelvin::new(5600)));
        assert_eq!(state.hs_color(), None);
        assert_eq!(state.rgb_color(), None);
    }

    #[test]
    fn test_failed_poll_keeps_mode_and_values() {
        let mut state = rgb_state();
        let before = state.clone();

        let resolved = state.reconcile_color([(ColorMode::Rgb, json!({"error": "offline"}))]);

        assert_eq!(resolved, None);
        assert_eq!(state, before);
        assert_eq!(state.rgb_color(), Some(Color::rgb(10, 20, 30)));
    }

    #[test]
    fn test_first_resolving_candidate_wins() {
        let mut state = LightState::new(ColorMode::Brightness);
        let resolved = state.reconcile_color([
            (ColorMode::ColorTemp, json!("n/a")),
            (ColorMode::HueSat, json!({"hue": 90, "sat": 40})),
            (ColorMode::Rgb, json!({"r": 1, "g": 2, "b": 3})),
        ]);

        assert_eq!(resolved, Some(ColorMode::HueSat));
        assert_eq!(state.hs_color(), HueSaturation::create(90, 40));
        assert_eq!(state.rgb_color(), None);
    }

    #[test]
    fn test_zero_kelvin_is_unresolved() {
        let mut state = rgb_state();
        assert!(!state.apply_color(ColorMode::ColorTemp, &json!(0)));
        assert_eq!(state.color_mode(), ColorMode::Rgb);
    }

    #[test]
    fn test_on_intensity() {
        let mut state = LightState::new(ColorMode::Brightness);
        assert_eq!(state.on_intensity().value(), 1000);
        state.set_brightness(Brightness::create(0));
        assert_eq!(state.on_intensity().value(), 1000);
        state.set_brightness(Brightness::create(51));
        assert_eq!(state.on_intensity().value(), 200);
    }
}
