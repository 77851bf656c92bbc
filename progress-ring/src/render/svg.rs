use std::fmt::Write;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::Error;
use crate::render::{ArcSegment, Renderer, Stroke};

/// A [`Renderer`] turning the ring into SVG.
///
/// Each drawn arc replaces the previous one; clones share the drawing.
///
/// # Example
/// ```
/// use progress_ring::animations::Orientation;
/// use progress_ring::render::{ArcSegment, Point, Renderer, Stroke, SvgRenderer};
///
/// let mut renderer = SvgRenderer::default();
/// let arc = ArcSegment::new(Point::new(50.0, 50.0), 40.0, Orientation::Right, 0.25);
/// renderer.draw_arc(&arc, &Stroke::default()).unwrap();
/// assert_eq!(renderer.get_path(), "M 90.00 50.00 A 40.00 40.00 0 0 0 50.00 10.00");
/// ```
#[derive(Clone, Debug, Default)]
pub struct SvgRenderer {
    drawing: Arc<RwLock<Option<(String, Stroke)>>>,
}

impl SvgRenderer {
    /// Returns the path data (`d` attribute) of an arc.
    ///
    /// Angles grow counter-clockwise on screen, hence a zero SVG sweep flag. A full circle is made
    /// of two half circles since a single SVG arc cannot start and end on the same point.
    pub fn path_data(arc: &ArcSegment) -> Result<String, Error> {
        let mut path = String::new();
        if arc.is_empty() {
            return Ok(path);
        }

        let start = arc.point_at(arc.start_angle);
        let r = arc.radius;
        write!(path, "M {:.2} {:.2}", start.x, start.y)?;
        if arc.is_full() {
            let opposite = arc.point_at(arc.start_angle + 180.0);
            write!(path, " A {r:.2} {r:.2} 0 1 0 {:.2} {:.2}", opposite.x, opposite.y)?;
            write!(path, " A {r:.2} {r:.2} 0 1 0 {:.2} {:.2} Z", start.x, start.y)?;
        } else {
            let end = arc.point_at(arc.end_angle);
            let large_arc = u8::from(arc.sweep > 180.0);
            write!(
                path,
                " A {r:.2} {r:.2} 0 {} 0 {:.2} {:.2}",
                large_arc, end.x, end.y
            )?;
        }
        Ok(path)
    }

    /// Returns the path data of the last drawn arc (empty if nothing was drawn).
    pub fn get_path(&self) -> String {
        self.drawing
            .read()
            .as_ref()
            .map(|(path, _)| path.clone())
            .unwrap_or_default()
    }

    /// Returns a standalone SVG document of the given size showing the last drawn arc.
    pub fn document(&self, width: f64, height: f64) -> Result<String, Error> {
        let mut svg = String::new();
        write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;
        if let Some((path, stroke)) = self.drawing.read().as_ref() {
            if !path.is_empty() {
                let cap = match stroke.round_cap {
                    true => "round",
                    false => "butt",
                };
                write!(
                    svg,
                    r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{}"/>"#,
                    path, stroke.color, stroke.width, cap
                )?;
            }
        }
        svg.push_str("</svg>");
        Ok(svg)
    }
}

impl Renderer for SvgRenderer {
    fn draw_arc(&mut self, arc: &ArcSegment, stroke: &Stroke) -> Result<(), Error> {
        let path = Self::path_data(arc)?;
        *self.drawing.write() = Some((path, *stroke));
        Ok(())
    }
}
