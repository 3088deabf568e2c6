//! Geometric primitives shared by the parser and the backends.
//!
//! # Coordinate System
//!
//! Every coordinate handed to a canvas uses the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Backends whose native system differs convert at their own boundary.

/// A 2D point in drawing coordinate space.
///
/// # Examples
///
/// ```
/// # use penstroke_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Euclidean length of the point taken as a vector.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns `true` when both coordinates are finite numbers.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Samples `segments` points evenly around an ellipse, starting at angle zero
/// (the rightmost point) and advancing in the direction of increasing angle.
///
/// # Examples
///
/// ```
/// # use penstroke_core::geometry::{Point, ellipse_points};
/// let pts = ellipse_points(Point::new(0.0, 0.0), 2.0, 1.0, 4);
/// assert_eq!(pts.len(), 4);
/// assert!((pts[0].x() - 2.0).abs() < 1e-6);
/// ```
pub fn ellipse_points(center: Point, rx: f32, ry: f32, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            Point::new(
                center.x + rx * angle.cos(),
                center.y + ry * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);
        assert_eq!(a.sub_point(b), Point::new(2.0, 3.0));
        assert_eq!(a.scale(2.0), Point::new(6.0, 8.0));
        assert!(approx_eq!(f32, a.hypot(), 5.0));
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_ellipse_points_lie_on_ellipse() {
        let center = Point::new(10.0, 20.0);
        for p in ellipse_points(center, 6.0, 3.0, 36) {
            let dx = (p.x() - center.x()) / 6.0;
            let dy = (p.y() - center.y()) / 3.0;
            assert!(approx_eq!(f32, dx * dx + dy * dy, 1.0, epsilon = 1e-4));
        }
    }
}
