//! Individual light control.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Value, json};

use crate::command::TurnOn;
use crate::config::NodeConfig;
use crate::protocol::{self, Action, Response};
use crate::registry::DeviceInfo;
use crate::session::Session;
use crate::state::{ColorValue, LightState};
use crate::types::{Brightness, ColorMode, Intensity, Kelvin, PowerMode, SupportedMode};

/// A single light attached to the controller.
///
/// The light keeps a local copy of its state. [`Light::update`] refreshes it from the
/// controller; commands update it optimistically without waiting for confirmation, since
/// the controller does not echo the applied values.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use amaran_lights_rs::{ControllerConfig, DeviceInfo, Kelvin, Light, NodeConfig, Session, TurnOn};
///
/// # async fn run() {
/// let session = Arc::new(Session::new(ControllerConfig::new("192.168.1.20", 12345, "c2VjcmV0")));
/// let device = DeviceInfo::new("dev-1", "node-1", "Key light");
/// let config = NodeConfig { cct_support: true, ..Default::default() };
///
/// let mut light = Light::new(session, device, config);
/// light.turn_on(&TurnOn::from(Kelvin::new(5600))).await;
/// light.update().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Light {
    device: DeviceInfo,
    config: NodeConfig,
    mode: SupportedMode,
    state: LightState,
    session: Arc<Session>,
}

impl Light {
    pub fn new(session: Arc<Session>, device: DeviceInfo, config: NodeConfig) -> Self {
        let mode = config.supported_mode();
        Light {
            device,
            state: LightState::new(mode.initial_color_mode()),
            config,
            mode,
            session,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device.device_id
    }

    pub fn node_id(&self) -> &str {
        &self.device.node_id
    }

    /// Display name, falling back to the device id.
    pub fn name(&self) -> &str {
        if self.device.name.is_empty() {
            &self.device.device_id
        } else {
            &self.device.name
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn supported_mode(&self) -> SupportedMode {
        self.mode
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    pub fn min_color_temp(&self) -> Kelvin {
        Kelvin::new(self.config.cct_range().0)
    }

    pub fn max_color_temp(&self) -> Kelvin {
        Kelvin::new(self.config.cct_range().1)
    }

    /// Mired bounds; the coldest white has the fewest mireds.
    pub fn mired_range(&self) -> Option<(u32, u32)> {
        Some((self.max_color_temp().mired()?, self.min_color_temp().mired()?))
    }

    /// Refresh the state from the controller.
    ///
    /// Brightness and power come from `get_intensity`. The color mode is then resolved by
    /// polling the current mode if the light supports it, otherwise its supported color
    /// mode. Anything that cannot be read leaves the previous value in place.
    pub async fn update(&mut self) {
        debug!("Updating {} (node {})", self.name(), self.node_id());

        let resp = self.send(Action::GetIntensity, None).await;
        match resp.data() {
            Some(data) => {
                self.state.apply_intensity(data);
            }
            None => warn!("No intensity reading for {}", self.name()),
        }

        for mode in self.poll_candidates() {
            let action = match mode {
                ColorMode::ColorTemp => Action::GetCct,
                ColorMode::HueSat => Action::GetHsi,
                ColorMode::Rgb => Action::GetRgb,
                ColorMode::Brightness => continue,
            };
            let resp = self.send(action, None).await;
            if let Some(data) = resp.data() {
                if self.state.apply_color(mode, data) {
                    debug!("{} is in {mode:?} mode", self.name());
                    return;
                }
            }
        }
        debug!(
            "{} color unresolved, keeping {:?}",
            self.name(),
            self.state.color_mode()
        );
    }

    /// Turn the light on, applying whatever the command carries.
    ///
    /// Only one color attribute is sent: color temperature (clamped to the node's range)
    /// wins over hue/saturation, which wins over RGB.
    pub async fn turn_on(&mut self, command: &TurnOn) {
        debug!("Turning on {} with {command:?}", self.name());
        let mut intensity = self.state.on_intensity();

        if let Some(brightness) = command.brightness {
            intensity = brightness.intensity();
            self.set_intensity(intensity).await;
            self.state.set_brightness(brightness);
        }

        if let Some(kelvin) = command.color_temp {
            let (min, max) = self.config.cct_range();
            let kelvin = kelvin.clamp(min, max);
            self.send(Action::SetCct, protocol::args(json!({"cct": kelvin.kelvin()})))
                .await;
            self.state.set_color(ColorValue::Temp(kelvin));
        } else if let Some(hs) = command.hs_color {
            let args = json!({
                "hue": hs.hue(),
                "sat": hs.saturation(),
                "intensity": intensity.value(),
            });
            self.send(Action::SetHsi, protocol::args(args)).await;
            self.state.set_color(ColorValue::HueSat(hs));
        } else if let Some(color) = command.rgb_color {
            let args = json!({
                "r": color.red(),
                "g": color.green(),
                "b": color.blue(),
                "intensity": intensity.value(),
            });
            self.send(Action::SetRgb, protocol::args(args)).await;
            self.state.set_color(ColorValue::Rgb(color));
        }

        if command.is_empty() {
            if self.state.brightness().is_none_or(|b| b.is_zero()) {
                self.state.set_brightness(Brightness::new());
            }
            self.set_intensity(self.state.on_intensity()).await;
        }

        self.state.set_power(PowerMode::On);
        debug!("{} is now {:?}", self.name(), self.state);
    }

    pub async fn turn_off(&mut self) {
        debug!("Turning off {}", self.name());
        self.set_intensity(Intensity::off()).await;
        self.state.set_power(PowerMode::Off);
    }

    /// Flip the power state as last known locally.
    pub async fn toggle(&mut self) {
        if self.is_on() {
            self.turn_off().await
        } else {
            self.turn_on(&TurnOn::new()).await
        }
    }

    /// Static attributes for host UIs.
    pub fn extra_attributes(&self) -> Value {
        let (cct_min, cct_max) = self.config.cct_range();
        json!({
            "device_id": self.device_id(),
            "node_id": self.node_id(),
            "cct_min": cct_min,
            "cct_max": cct_max,
        })
    }

    /// Returns diagnostics including state, capabilities, and session history.
    pub async fn diagnostics(&self) -> Value {
        let mut diag = self.extra_attributes();
        diag["name"] = json!(self.name());
        diag["supported_mode"] = json!(format!("{:?}", self.mode));
        diag["state"] = serde_json::to_value(&self.state).unwrap_or(Value::Null);
        diag["history"] =
            serde_json::to_value(self.session.history().await.summary()).unwrap_or(Value::Null);
        diag
    }

    fn poll_candidates(&self) -> Vec<ColorMode> {
        let current = self.state.color_mode();
        if current != ColorMode::Brightness && self.mode.supports(current) {
            return vec![current];
        }
        self.mode.color_mode().into_iter().collect()
    }

    async fn set_intensity(&self, intensity: Intensity) -> Response {
        let args = json!({"intensity": intensity.value()});
        self.send(Action::SetIntensity, protocol::args(args)).await
    }

    async fn send(
        &self,
        action: Action,
        args: Option<serde_json::Map<String, Value>>,
    ) -> Response {
        self.session
            .send_request(action, Some(self.node_id()), args)
            .await
    }
}
