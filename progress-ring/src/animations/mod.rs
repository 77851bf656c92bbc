//! Defines the animation of a ring: its configuration and the state machine deciding, at any
//! instant, what value is displayed and whether the ring must keep redrawing.

mod config;
mod machine;
mod orientation;

pub use config::{AnimationConfig, CompletionCallback};
pub(crate) use config::clamp_fraction;
pub use machine::{AnimationMachine, AnimationState, Tick};
pub use orientation::Orientation;
