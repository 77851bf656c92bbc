//! Defines the widgets built on top of the animation machine.

pub use ring::{ProgressRing, RingEvent};

mod ring;
