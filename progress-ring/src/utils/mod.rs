//! Runtime helpers shared by the widgets: task runner, event manager.

#[cfg(test)]
pub use serial_test;
pub use log;
pub use tokio;
pub use tokio::time::sleep;

pub use events::{EventHandler, EventManager};
pub use task::TaskHandler;

pub mod events;
pub mod task;
