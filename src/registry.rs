//! Device registry and command dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use crate::config::NodeConfig;
use crate::errors::Error;
use crate::light::Light;
use crate::protocol::{self, Action, Response};
use crate::session::Session;

type Result<T> = std::result::Result<T, Error>;

/// Device id the controller uses for its "all lights" group entry.
pub const GROUP_SENTINEL: &str = "00000000000000000000000000000000";

/// One entry of `get_device_list`.
///
/// The device id is read from `id` or `device_id`. When both are present `id` wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "WireDevice")]
pub struct DeviceInfo {
    #[serde(rename = "id")]
    pub device_id: String,
    pub node_id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct WireDevice {
    id: Option<String>,
    device_id: Option<String>,
    node_id: String,
    #[serde(default)]
    name: String,
}

impl TryFrom<WireDevice> for DeviceInfo {
    type Error = String;

    fn try_from(wire: WireDevice) -> std::result::Result<Self, Self::Error> {
        let device_id = wire
            .id
            .or(wire.device_id)
            .ok_or("device entry has neither `id` nor `device_id`")?;
        Ok(DeviceInfo {
            device_id,
            node_id: wire.node_id,
            name: wire.name,
        })
    }
}

impl DeviceInfo {
    pub fn new(device_id: &str, node_id: &str, name: &str) -> Self {
        DeviceInfo {
            device_id: device_id.to_string(),
            node_id: node_id.to_string(),
            name: name.to_string(),
        }
    }

    /// Whether this is the controller's group pseudo-device.
    pub fn is_group(&self) -> bool {
        self.device_id == GROUP_SENTINEL
    }
}

/// A scene stored on the controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quickshot {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub name: Option<String>,
}

impl Quickshot {
    /// The name, or `Quickshot <id>` when the controller sent none.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Quickshot {}", self.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub name: Option<String>,
}

/// Presets of one kind, as grouped by `get_preset_list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresetGroup {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub list: Vec<Preset>,
}

// Ids arrive as strings or numbers depending on firmware.
fn wire_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match WireId::deserialize(deserializer)? {
        WireId::Text(s) => s,
        WireId::Number(n) => n.to_string(),
    })
}

/// Everything known about one controller: its lights, quickshots and presets.
///
/// A registry is built in one go by [`Registry::discover`]; to pick up changes on the
/// controller, discover again and replace the old registry.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use amaran_lights_rs::{ControllerConfig, Registry, Session};
///
/// # async fn run() -> Result<(), amaran_lights_rs::Error> {
/// let session = Arc::new(Session::new(ControllerConfig::new("192.168.1.20", 12345, "c2VjcmV0")));
/// let registry = Registry::discover(session).await;
/// for (id, label) in registry.quickshot_options() {
///     println!("{id}: {label}");
/// }
/// registry.apply_quickshot("dev-1", "7").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    session: Arc<Session>,
    devices: BTreeMap<String, Light>,
    quickshots: Vec<Quickshot>,
    presets: Vec<PresetGroup>,
}

impl Registry {
    /// An empty registry bound to `session`.
    pub fn new(session: Arc<Session>) -> Self {
        Registry {
            session,
            devices: BTreeMap::new(),
            quickshots: Vec::new(),
            presets: Vec::new(),
        }
    }

    /// Query the controller for its devices, their capabilities, quickshots and presets.
    ///
    /// The group pseudo-device is skipped, as is any device whose node config cannot be
    /// read. If the device list itself is unavailable the registry has no devices.
    pub async fn discover(session: Arc<Session>) -> Self {
        let mut registry = Registry::new(session);

        let resp = registry.session.get_device_list().await;
        let Some(entries) = resp.data().and_then(Value::as_array) else {
            error!("Failed to get device list");
            return registry;
        };

        for entry in entries {
            let device = match DeviceInfo::deserialize(entry) {
                Ok(device) => device,
                Err(e) => {
                    warn!("Skipping malformed device entry {entry}: {e}");
                    continue;
                }
            };
            if device.is_group() {
                debug!("Skipping group entry {}", device.name);
                continue;
            }

            let Some(config) = registry.node_config(&device).await else {
                continue;
            };
            debug!(
                "Found {} ({}) driven as {:?}",
                device.name,
                device.device_id,
                config.supported_mode()
            );
            let light = Light::new(registry.session.clone(), device, config);
            registry
                .devices
                .insert(light.device_id().to_string(), light);
        }

        registry.refresh_scenes().await;
        info!(
            "Discovered {} devices, {} quickshots, {} preset groups",
            registry.devices.len(),
            registry.quickshots.len(),
            registry.presets.len()
        );
        registry
    }

    /// Reload the quickshot and preset lists. A list that cannot be fetched keeps its
    /// previous contents.
    pub async fn refresh_scenes(&mut self) {
        match self.session.get_quickshot_list().await.data() {
            Some(data) => self.quickshots = parse_items(data, "quickshot"),
            None => warn!("Quickshot list unavailable"),
        }
        match self.session.get_preset_list().await.data() {
            Some(data) => self.presets = parse_items(data, "preset group"),
            None => warn!("Preset list unavailable"),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn device(&self, device_id: &str) -> Option<&Light> {
        self.devices.get(device_id)
    }

    pub fn device_mut(&mut self, device_id: &str) -> Option<&mut Light> {
        self.devices.get_mut(device_id)
    }

    /// Lights ordered by device id.
    pub fn devices(&self) -> impl Iterator<Item = &Light> {
        self.devices.values()
    }

    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut Light> {
        self.devices.values_mut()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn quickshots(&self) -> &[Quickshot] {
        &self.quickshots
    }

    pub fn presets(&self) -> &[PresetGroup] {
        &self.presets
    }

    /// `(id, label)` pairs for a quickshot selector.
    pub fn quickshot_options(&self) -> Vec<(String, String)> {
        self.quickshots
            .iter()
            .map(|q| (q.id.clone(), q.label()))
            .collect()
    }

    /// Send `action` to a device's node.
    ///
    /// Fails with [`Error::DeviceNotFound`] without sending anything if the id is unknown.
    /// The args are forwarded untouched.
    pub async fn dispatch(
        &self,
        device_id: &str,
        action: impl AsRef<str>,
        args: Option<Map<String, Value>>,
    ) -> Result<Response> {
        let light = self.lookup(device_id)?;
        Ok(self
            .session
            .send_request(action, Some(light.node_id()), args)
            .await)
    }

    pub async fn apply_preset(&self, device_id: &str, preset_id: &str) -> Result<Response> {
        self.dispatch(
            device_id,
            Action::SetPreset,
            protocol::args(json!({"preset_id": preset_id})),
        )
        .await
    }

    /// Apply a quickshot to a device.
    ///
    /// Once the quickshot list has been loaded, ids not in it are rejected with
    /// [`Error::QuickshotNotFound`].
    pub async fn apply_quickshot(&self, device_id: &str, quickshot_id: &str) -> Result<Response> {
        self.lookup(device_id)?;
        if !self.quickshots.is_empty() && !self.quickshots.iter().any(|q| q.id == quickshot_id) {
            error!("Quickshot {quickshot_id} not found");
            return Err(Error::QuickshotNotFound(quickshot_id.to_string()));
        }
        self.dispatch(
            device_id,
            Action::SetQuickshot,
            protocol::args(json!({"quickshot_id": quickshot_id})),
        )
        .await
    }

    /// A device's attributes plus the quickshot and preset catalogs, keyed by id.
    pub fn extra_attributes(&self, device_id: &str) -> Option<Value> {
        let mut attrs = self.device(device_id)?.extra_attributes();

        let quickshots: Map<String, Value> = self
            .quickshots
            .iter()
            .map(|q| (q.id.clone(), json!(q.label())))
            .collect();
        let presets: Map<String, Value> = self
            .presets
            .iter()
            .flat_map(|group| group.list.iter())
            .filter_map(|p| p.name.as_ref().map(|name| (p.id.clone(), json!(name))))
            .collect();

        attrs["quickshot_ids"] = Value::Object(quickshots);
        attrs["preset_ids"] = Value::Object(presets);
        Some(attrs)
    }

    fn lookup(&self, device_id: &str) -> Result<&Light> {
        self.devices.get(device_id).ok_or_else(|| {
            error!("Device {device_id} not found, command dropped");
            Error::DeviceNotFound(device_id.to_string())
        })
    }

    async fn node_config(&self, device: &DeviceInfo) -> Option<NodeConfig> {
        let resp = self.session.get_node_config(&device.node_id).await;
        let Some(data) = resp.data() else {
            error!("Failed to get node config for {}", device.name);
            return None;
        };
        NodeConfig::deserialize(data)
            .map_err(|e| error!("Unusable node config for {}: {e}", device.name))
            .ok()
    }
}

fn parse_items<T: DeserializeOwned>(data: &Value, what: &str) -> Vec<T> {
    let Some(items) = data.as_array() else {
        warn!("Expected a {what} list, got {data}");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping malformed {what} {item}: {e}");
                None
            }
        })
        .collect()
}
