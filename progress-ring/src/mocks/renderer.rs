use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{Error, RenderError};
use crate::render::{ArcSegment, Renderer, Stroke};

/// Mock [`Renderer`] for testing purposes: records every drawn arc.
///
/// Clones share the recorded frames and the failure switch.
#[derive(Clone, Debug, Default)]
pub struct MockRenderer {
    frames: Arc<RwLock<Vec<ArcSegment>>>,
    failing: Arc<AtomicBool>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every further draw fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns all arcs drawn so far.
    pub fn get_frames(&self) -> Vec<ArcSegment> {
        self.frames.read().clone()
    }

    pub fn get_frame_count(&self) -> usize {
        self.frames.read().len()
    }

    pub fn get_last_frame(&self) -> Option<ArcSegment> {
        self.frames.read().last().copied()
    }
}

impl Display for MockRenderer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockRenderer [frames={}]", self.get_frame_count())
    }
}

impl Renderer for MockRenderer {
    fn draw_arc(&mut self, arc: &ArcSegment, _: &Stroke) -> Result<(), Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RenderError::RendererFailure {
                renderer: String::from("MockRenderer"),
                info: String::from("mocked failure"),
            }
            .into());
        }
        self.frames.write().push(*arc);
        Ok(())
    }
}
