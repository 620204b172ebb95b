//! Controller endpoint configuration and per-node capabilities.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{BoolFromInt, DurationMilliSeconds, PickFirst, serde_as};

use crate::types::SupportedMode;

/// Connection settings for one controller endpoint.
///
/// The host application owns these values; the crate only reads them. Durations are
/// expressed in milliseconds when (de)serialized.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use amaran_lights_rs::ControllerConfig;
///
/// let config: ControllerConfig = serde_json::from_str(
///     r#"{"host": "192.168.1.20", "api_key": "c2VjcmV0"}"#,
/// ).unwrap();
/// assert_eq!(config.port, 12345);
/// assert_eq!(config.min_request_interval, Duration::from_millis(200));
/// ```
#[serde_as]
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerConfig {
    pub host: String,
    #[serde(default = "ControllerConfig::default_port")]
    pub port: u16,
    /// Base64-encoded AES-256 key shared with the controller.
    pub api_key: String,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "ControllerConfig::default_min_request_interval")]
    pub min_request_interval: Duration,
    /// Upper bound on the wait for a single reply.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "ControllerConfig::default_receive_timeout")]
    pub receive_timeout: Duration,
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("min_request_interval", &self.min_request_interval)
            .field("receive_timeout", &self.receive_timeout)
            .finish()
    }
}

impl ControllerConfig {
    pub const DEFAULT_PORT: u16 = 12345;
    const MIN_REQUEST_INTERVAL_MS: u64 = 200;
    const RECEIVE_TIMEOUT_MS: u64 = 10_000;

    pub fn new(host: &str, port: u16, api_key: &str) -> Self {
        ControllerConfig {
            host: host.to_string(),
            port,
            api_key: api_key.to_string(),
            min_request_interval: Self::default_min_request_interval(),
            receive_timeout: Self::default_receive_timeout(),
        }
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_min_request_interval() -> Duration {
        Duration::from_millis(Self::MIN_REQUEST_INTERVAL_MS)
    }

    fn default_receive_timeout() -> Duration {
        Duration::from_millis(Self::RECEIVE_TIMEOUT_MS)
    }
}

/// Capability flags and limits reported by `get_node_config`.
///
/// Flags are accepted as booleans or as `0`/`1`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    #[serde_as(as = "PickFirst<(_, BoolFromInt)>")]
    #[serde(default)]
    pub cct_support: bool,
    #[serde_as(as = "PickFirst<(_, BoolFromInt)>")]
    #[serde(default)]
    pub rgb_support: bool,
    #[serde_as(as = "PickFirst<(_, BoolFromInt)>")]
    #[serde(default)]
    pub hsi_support: bool,
    #[serde_as(as = "PickFirst<(_, BoolFromInt)>")]
    #[serde(default = "NodeConfig::default_dimming")]
    pub dimming_support: bool,
    #[serde(default = "NodeConfig::default_cct_min")]
    pub cct_min: u16,
    #[serde(default = "NodeConfig::default_cct_max")]
    pub cct_max: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            cct_support: false,
            rgb_support: false,
            hsi_support: false,
            dimming_support: true,
            cct_min: Self::CCT_MIN,
            cct_max: Self::CCT_MAX,
        }
    }
}

impl NodeConfig {
    pub const CCT_MIN: u16 = 2000;
    pub const CCT_MAX: u16 = 10000;

    /// The single mode this node is driven in.
    ///
    /// Color temperature beats hue/saturation, which beats RGB.
    ///
    /// A node that only advertises `rgb_support` is driven as [`SupportedMode::Rgb`] and polled
    /// with `get_rgb`. The controller's own integration folds such nodes into hue/saturation
    /// and polls `get_hsi` instead, so their reported color mode differs between the two.
    ///
    /// # Examples
    ///
    /// ```
    /// use amaran_lights_rs::{NodeConfig, SupportedMode};
    ///
    /// let config = NodeConfig { cct_support: true, rgb_support: true, ..Default::default() };
    /// assert_eq!(config.supported_mode(), SupportedMode::ColorTemp);
    ///
    /// let config = NodeConfig { rgb_support: true, ..Default::default() };
    /// assert_eq!(config.supported_mode(), SupportedMode::Rgb);
    ///
    /// assert_eq!(NodeConfig::default().supported_mode(), SupportedMode::Brightness);
    /// ```
    pub fn supported_mode(&self) -> SupportedMode {
        if self.cct_support {
            SupportedMode::ColorTemp
        } else if self.hsi_support {
            SupportedMode::HueSat
        } else if self.rgb_support {
            SupportedMode::Rgb
        } else if self.dimming_support {
            SupportedMode::Brightness
        } else {
            SupportedMode::OnOff
        }
    }

    /// Kelvin bounds, ordered low to high.
    pub fn cct_range(&self) -> (u16, u16) {
        if self.cct_min <= self.cct_max {
            (self.cct_min, self.cct_max)
        } else {
            (self.cct_max, self.cct_min)
        }
    }

    fn default_dimming() -> bool {
        true
    }

    fn default_cct_min() -> u16 {
        Self::CCT_MIN
    }

    fn default_cct_max() -> u16 {
        Self::CCT_MAX
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_controller_config_defaults_and_overrides() {
        let config: ControllerConfig = serde_json::from_value(json!({
            "host": "localhost",
            "port": 4000,
            "api_key": "c2VjcmV0",
            "receive_timeout": 2500,
        }))
        .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.receive_timeout, Duration::from_millis(2500));
        assert_eq!(config.min_request_interval, Duration::from_millis(200));
    }

    #[test]
    fn test_controller_config_debug_hides_key() {
        let config = ControllerConfig::new("localhost", 12345, "c2VjcmV0");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("c2VjcmV0"));
    }

    #[test]
    fn test_node_config_tolerates_missing_fields() {
        let config: NodeConfig = serde_json::from_value(json!({
            "cct_support": 1,
            "rgb_support": false,
            "cct_min": 2700,
            "firmware": "1.2.3",
        }))
        .unwrap();

        assert_eq!(config.cct_range(), (2700, 10000));
        assert_eq!(config.supported_mode(), SupportedMode::ColorTemp);
    }

    #[test]
    fn test_supported_mode_priority() {
        let hsi_and_rgb = NodeConfig {
            hsi_support: true,
            rgb_support: true,
            ..Default::default()
        };
        assert_eq!(hsi_and_rgb.supported_mode(), SupportedMode::HueSat);

        let switch_only = NodeConfig {
            dimming_support: false,
            ..Default::default()
        };
        assert_eq!(switch_only.supported_mode(), SupportedMode::OnOff);
    }
}
