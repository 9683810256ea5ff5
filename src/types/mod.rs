//! Value types for light control parameters.

mod brightness;
mod color;
mod power;
mod transition;

pub use brightness::Brightness;
pub use color::Color;
pub use power::PowerMode;
pub use transition::TransitionTime;
