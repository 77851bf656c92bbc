use std::fmt::{Display, Formatter};

use crate::animations::{clamp_fraction, Orientation};

/// A point in screen coordinates (y grows downward).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// The frame a widget is drawn into.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

impl Bounds {
    /// Creates a frame; negative or NaN sizes are brought back to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    /// Returns the radius of the largest ring with the given stroke width fitting in the frame.
    pub fn ring_radius(&self, stroke_width: f64) -> f64 {
        ((self.width.min(self.height) - stroke_width) / 2.0).max(0.0)
    }
}

/// An RGBA color.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0x00, 0x7A, 0xFF)
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Displays as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xFF {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// How the ring arc is stroked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// The line width (default: 8.0).
    pub width: f64,
    /// The line color.
    pub color: Color,
    /// Round line ends (default: true).
    pub round_cap: bool,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 8.0,
            color: Color::default(),
            round_cap: true,
        }
    }
}

impl Stroke {
    pub fn set_width(mut self, width: f64) -> Self {
        self.width = width.max(0.0);
        self
    }

    pub fn set_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn set_round_cap(mut self, round_cap: bool) -> Self {
        self.round_cap = round_cap;
        self
    }
}

/// One arc to be drawn by a [`Renderer`](crate::render::Renderer).
///
/// Angles are in degrees, 0° pointing right and increasing counter-clockwise. Since both 0% and
/// 100% of a ring share the same end angle, `sweep` tells them apart: it is the unwrapped angle
/// (within [0, 360]) travelled from `start_angle` to `end_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub sweep: f64,
}

impl ArcSegment {
    /// Builds the arc displaying `value` (a fraction of the circle) from the `orientation`
    /// reference point.
    pub fn new(center: Point, radius: f64, orientation: Orientation, value: f64) -> Self {
        let value = clamp_fraction(value);
        Self {
            center,
            radius,
            start_angle: orientation.angle_for(0.0),
            end_angle: orientation.angle_for(value),
            sweep: value * 360.0,
        }
    }

    /// Indicates an empty arc (nothing to draw).
    pub fn is_empty(&self) -> bool {
        self.sweep <= 0.0 || self.radius <= 0.0
    }

    /// Indicates a complete circle.
    pub fn is_full(&self) -> bool {
        self.sweep >= 360.0
    }

    /// Returns the point of the circle at a given angle, in screen coordinates.
    pub fn point_at(&self, angle: f64) -> Point {
        let radians = angle.to_radians();
        Point::new(
            self.center.x + self.radius * radians.cos(),
            self.center.y - self.radius * radians.sin(),
        )
    }
}

impl Display for ArcSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Arc [center=({}, {}), radius={}, from={}°, to={}°, sweep={}°]",
            self.center.x, self.center.y, self.radius, self.start_angle, self.end_angle, self.sweep
        )
    }
}
