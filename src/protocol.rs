//! Request envelopes and controller responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Protocol version sent in every envelope.
pub const PROTOCOL_VERSION: u32 = 2;

/// Actions understood by the controller.
///
/// The session accepts any `AsRef<str>` as an action, so names missing here can still be
/// forwarded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    GetDeviceList,
    GetNodeConfig,
    GetQuickshotList,
    GetPresetList,
    GetIntensity,
    SetIntensity,
    GetCct,
    SetCct,
    GetHsi,
    SetHsi,
    GetRgb,
    SetRgb,
    SetPreset,
    SetQuickshot,
}

/// A single request as written to the socket.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub client_id: u64,
    pub request_id: u64,
    pub action: String,
    pub token: String,
    pub node_id: Option<String>,
    pub args: Option<Map<String, Value>>,
}

impl RequestEnvelope {
    pub fn new(
        client_id: u64,
        request_id: u64,
        action: &str,
        token: String,
        node_id: Option<&str>,
        args: Option<Map<String, Value>>,
    ) -> Self {
        RequestEnvelope {
            version: PROTOCOL_VERSION,
            kind: "request".to_string(),
            client_id,
            request_id,
            action: action.to_string(),
            token,
            node_id: node_id.filter(|n| !n.is_empty()).map(String::from),
            args: args.filter(|a| !a.is_empty()),
        }
    }
}

/// A reply from the controller.
///
/// The controller guarantees no schema. Most replies carry a `data` field whose shape
/// depends on the action. An empty response is what the session returns when no answer
/// could be obtained.
///
/// # Example
///
/// ```
/// use amaran_lights_rs::Response;
///
/// let resp: Response = serde_json::from_str(r#"{"code": 0, "data": 500}"#).unwrap();
/// assert_eq!(resp.data().and_then(|d| d.as_u64()), Some(500));
/// assert!(Response::empty().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(Map<String, Value>);

impl Response {
    /// The "no answer" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `data` field, if present.
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// The `data` field as a list of objects.
    ///
    /// Non-object entries are skipped.
    pub fn data_list(&self) -> Vec<&Map<String, Value>> {
        self.data()
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Turn a `json!` object literal into request args.
pub(crate) fn args(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

impl From<Map<String, Value>> for Response {
    fn from(map: Map<String, Value>) -> Self {
        Response(map)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(Action::GetDeviceList.as_ref(), "get_device_list");
        assert_eq!(Action::SetHsi.to_string(), "set_hsi");
        assert_eq!(Action::from_str("set_quickshot"), Ok(Action::SetQuickshot));
        assert!(
            Action::iter().all(|a| a
                .as_ref()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'))
        );
    }

    #[test]
    fn test_envelope_serialization() {
        let mut args = Map::new();
        args.insert("intensity".into(), json!(500));
        let envelope = RequestEnvelope::new(
            1,
            7,
            Action::SetIntensity.as_ref(),
            "tok".into(),
            Some("node-1"),
            Some(args),
        );

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "version": 2,
                "type": "request",
                "client_id": 1,
                "request_id": 7,
                "action": "set_intensity",
                "token": "tok",
                "node_id": "node-1",
                "args": {"intensity": 500},
            })
        );
    }

    #[test]
    fn test_envelope_omits_missing_node_and_args() {
        let envelope =
            RequestEnvelope::new(1, 1, "get_device_list", "tok".into(), Some(""), Some(Map::new()));
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("node_id").is_none());
        assert!(value.get("args").is_none());
    }

    #[test]
    fn test_response_data_list() {
        let resp: Response = serde_json::from_value(json!({
            "data": [{"id": 1, "name": "a"}, 3, {"id": 2, "name": "b"}]
        }))
        .unwrap();
        let items = resp.data_list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["name"], "b");
        assert!(Response::empty().data_list().is_empty());
    }
}
