//! Value types for light control parameters.

mod brightness;
mod color;
mod hue_saturation;
mod kelvin;
mod mode;
mod power;

pub use brightness::{Brightness, Intensity};
pub use color::Color;
pub use hue_saturation::HueSaturation;
pub use kelvin::Kelvin;
pub use mode::{ColorMode, SupportedMode};
pub use power::PowerMode;
