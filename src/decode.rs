//! Tolerant decoders for controller telemetry.
//!
//! The controller does not commit to a shape for `data`: a field may arrive as a bare
//! number, as an object with named keys, or as an object whose keys differ between
//! firmware versions. Each decoder tries the shapes in a fixed order and returns `None`
//! when nothing usable is found; none of them fail.
//!
//! When an object lacks the expected key, [`scalar`] takes the first numeric value in wire
//! order. This is a best-effort policy kept for compatibility with older firmware. It can
//! pick the wrong field if a firmware variant puts an unrelated number first.

use log::warn;
use serde_json::{Map, Value};

use crate::types::{Color, HueSaturation};

/// Decode a single numeric field.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use amaran_lights_rs::decode;
///
/// assert_eq!(decode::scalar(&json!(500), "intensity"), Some(500.0));
/// assert_eq!(decode::scalar(&json!({"intensity": 250}), "intensity"), Some(250.0));
/// assert_eq!(decode::scalar(&json!({"node": "a", "level": 10}), "intensity"), Some(10.0));
/// assert_eq!(decode::scalar(&json!({"node": "a"}), "intensity"), None);
/// assert_eq!(decode::scalar(&json!("500"), "intensity"), None);
/// ```
pub fn scalar(data: &Value, key: &str) -> Option<f64> {
    match data {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => match map.get(key).and_then(Value::as_f64) {
            Some(v) => Some(v),
            None => first_number(map),
        },
        _ => None,
    }
}

/// Decode a hue/saturation pair.
///
/// A bare number is taken as the hue at full saturation.
pub fn hue_sat(data: &Value) -> Option<HueSaturation> {
    match data {
        Value::Object(map) => {
            let hue = lookup_number(map, "hue")?;
            let sat = lookup_number(map, "sat")?;
            HueSaturation::from_reading(hue, sat)
        }
        Value::Number(n) => {
            let hue = n.as_f64()?;
            warn!("HSI data is a single value {hue}, assuming full saturation");
            HueSaturation::from_reading(hue, 100.0)
        }
        _ => None,
    }
}

/// Decode an RGB triple.
///
/// Channels must be integers. A bare number is taken as a grey level.
pub fn rgb(data: &Value) -> Option<Color> {
    match data {
        Value::Object(map) => {
            let r = lookup_integer(map, "r")?;
            let g = lookup_integer(map, "g")?;
            let b = lookup_integer(map, "b")?;
            Color::from_reading(r, g, b)
        }
        Value::Number(n) => {
            let level = n.as_f64()? as i64;
            warn!("RGB data is a single value {level}, using grayscale");
            Color::from_reading(level, level, level)
        }
        _ => None,
    }
}

fn first_number(map: &Map<String, Value>) -> Option<f64> {
    map.values().find_map(Value::as_f64)
}

// Exact key first, then a case-insensitive match.
fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn lookup_number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    lookup(map, key).and_then(Value::as_f64)
}

fn lookup_integer(map: &Map<String, Value>, key: &str) -> Option<i64> {
    lookup(map, key).and_then(Value::as_i64)
}
