use std::fmt::{Display, Formatter};

/// The point of the circle used as zero reference by a ring.
///
/// Angles are expressed in degrees, following the standard mathematical convention: 0° points
/// right and angles increase counter-clockwise.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Zero at 12 o'clock (90°).
    #[default]
    Top,
    /// Zero at 3 o'clock (0°).
    Right,
    /// Zero at 6 o'clock (270°).
    Bottom,
    /// Zero at 9 o'clock (180°).
    Left,
}

impl Orientation {
    /// Returns the angle (in degrees) of the zero reference point.
    pub fn offset(&self) -> f64 {
        match self {
            Orientation::Top => 90.0,
            Orientation::Right => 0.0,
            Orientation::Bottom => 270.0,
            Orientation::Left => 180.0,
        }
    }

    /// Maps a fraction of the circle to an angle in [0, 360).
    ///
    /// A full turn (360°) is swept from the reference point. Out-of-range values wrap around the
    /// circle; a NaN value maps to the reference point itself.
    ///
    /// # Example
    /// ```
    /// use progress_ring::animations::Orientation;
    ///
    /// assert_eq!(Orientation::Top.angle_for(0.25), 180.0);
    /// assert_eq!(Orientation::Top.angle_for(1.0), 90.0);
    /// ```
    pub fn angle_for(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.offset();
        }
        let angle = (self.offset() + value * 360.0).rem_euclid(360.0);
        // rem_euclid may round up to the modulus itself for tiny negative inputs.
        match angle >= 360.0 {
            true => 0.0,
            false => angle,
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Orientation::Top => "top",
            Orientation::Right => "right",
            Orientation::Bottom => "bottom",
            Orientation::Left => "left",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Orientation::default(), Orientation::Top);
        assert_eq!(Orientation::Top.offset(), 90.0);
        assert_eq!(Orientation::Right.offset(), 0.0);
        assert_eq!(Orientation::Bottom.offset(), 270.0);
        assert_eq!(Orientation::Left.offset(), 180.0);
    }

    #[test]
    fn test_angle_for() {
        // A full ring from the top lands back on the top: 90 + 360 = 450 => 90.
        assert_eq!(Orientation::Top.angle_for(1.0), 90.0);
        assert_eq!(Orientation::Top.angle_for(0.0), 90.0);
        assert_eq!(Orientation::Top.angle_for(0.5), 270.0);
        assert_eq!(Orientation::Right.angle_for(0.25), 90.0);
        assert_eq!(Orientation::Bottom.angle_for(0.5), 90.0);
        assert_eq!(Orientation::Left.angle_for(0.75), 90.0);
    }

    #[test]
    fn test_angle_for_out_of_range() {
        assert_eq!(Orientation::Right.angle_for(1.25), 90.0);
        assert_eq!(Orientation::Right.angle_for(-0.25), 270.0);
        assert_eq!(Orientation::Top.angle_for(f64::NAN), 90.0);
        assert_eq!(Orientation::Left.angle_for(f64::INFINITY), 180.0);
        let angle = Orientation::Right.angle_for(-1e-18);
        assert!((0.0..360.0).contains(&angle));
    }

    #[test]
    fn test_display() {
        assert_eq!(Orientation::Top.to_string(), "top");
        assert_eq!(Orientation::Bottom.to_string(), "bottom");
    }
}
