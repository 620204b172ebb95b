//! Power mode for light control.

use serde::{Deserialize, Serialize};

/// Power state for a light.
///
/// The controller has no separate power switch: a light is on whenever its intensity is
/// above zero.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerMode {
    /// Turn the light on
    On,
    /// Turn the light off
    #[default]
    Off,
}

impl PowerMode {
    pub fn is_on(&self) -> bool {
        matches!(self, PowerMode::On)
    }
}

impl From<bool> for PowerMode {
    fn from(on: bool) -> Self {
        if on { PowerMode::On } else { PowerMode::Off }
    }
}
