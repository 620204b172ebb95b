//! # amaran_lights_rs
//!
//! An async Rust client for Amaran lighting controllers.
//!
//! The controller exposes its lights over a local WebSocket. Every request carries an
//! AES-256-GCM token derived from a shared secret, and the controller expects no more than
//! one request at a time. This crate handles both and keeps a local model of each light.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use amaran_lights_rs::{ControllerConfig, Kelvin, Registry, Session, TurnOn};
//!
//! async fn warm_up() {
//!     let config = ControllerConfig::new("192.168.1.20", 12345, "c2VjcmV0");
//!     let session = Arc::new(Session::new(config));
//!     let mut registry = Registry::discover(session).await;
//!
//!     for light in registry.devices_mut() {
//!         light.turn_on(&TurnOn::from(Kelvin::new(3200))).await;
//!     }
//! }
//! ```
//!
//! ## Layers
//!
//! - [`TokenGenerator`]: authentication tokens from the shared secret
//! - [`Session`]: the socket, request pacing, reconnects
//! - [`Response`] and [`Action`]: the wire envelope
//! - [`Light`] and [`LightState`]: telemetry decoding and the color-mode state machine
//! - [`Registry`]: discovery, presets, quickshots, and dispatch by device id
//!
//! ## Failure Model
//!
//! Talking to the controller never returns an error. An unreachable controller, a bad
//! secret or a broken connection yields an empty [`Response`], and the light keeps its
//! last known state. Details go to the `log` facade and to [`Session::history`]. Only
//! dispatching to an unknown device or quickshot fails with an [`Error`].

mod command;
mod config;
pub mod decode;
mod errors;
mod history;
mod light;
mod protocol;
mod registry;
pub mod runtime;
mod session;
mod state;
mod token;
mod types;

#[cfg(test)]
mod testing;

// Re-export public API
pub use command::TurnOn;
pub use config::{ControllerConfig, NodeConfig};
pub use errors::Error;
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use light::Light;
pub use protocol::{Action, PROTOCOL_VERSION, RequestEnvelope, Response};
pub use registry::{DeviceInfo, GROUP_SENTINEL, Preset, PresetGroup, Quickshot, Registry};
pub use session::Session;
pub use state::{ColorValue, LightState};
pub use token::TokenGenerator;
pub use types::{
    Brightness, Color, ColorMode, HueSaturation, Intensity, Kelvin, PowerMode, SupportedMode,
};
