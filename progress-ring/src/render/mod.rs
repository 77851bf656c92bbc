//! Defines the capabilities a ring consumes from its host: drawing an arc and requesting a
//! future render pass.

use std::fmt::Debug;
use std::time::Duration;

use dyn_clone::DynClone;

pub use crate::render::geometry::{ArcSegment, Bounds, Color, Point, Stroke};
pub use crate::render::svg::SvgRenderer;
use crate::errors::Error;

mod geometry;
mod svg;

/// Draws the arc of a ring.
///
/// Renderers are cloned along with the ring owning them: implementations sharing a drawing
/// surface should keep it behind an `Arc`.
pub trait Renderer: Debug + DynClone + Send + Sync {
    /// Draws a stroked arc.
    ///
    /// An empty arc ([`ArcSegment::is_empty`]) is still given to the renderer so it can clear what
    /// was previously drawn.
    fn draw_arc(&mut self, arc: &ArcSegment, stroke: &Stroke) -> Result<(), Error>;
}
dyn_clone::clone_trait_object!(Renderer);

/// Schedules a future render pass of the ring.
///
/// A ring asks for at most one redraw per render pass, always with a zero delay: the host is
/// expected to call [`ProgressRing::render`](crate::widgets::ProgressRing::render) at its next
/// redraw opportunity.
pub trait RedrawRequester: Debug + DynClone + Send + Sync {
    fn request_redraw(&self, after: Duration);
}
dyn_clone::clone_trait_object!(RedrawRequester);
