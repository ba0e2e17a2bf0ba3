//! Geometry Primitives
//!
//! Document coordinates are y-up: positive y is towards the top of the
//! page and positive angles turn counterclockwise, in degrees.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounds in y-up coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

/// 2x3 affine matrix of a text frame, host layout (a b c d tx ty).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    #[serde(default)]
    pub tx: f64,
    #[serde(default)]
    pub ty: f64,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TextMatrix {
    pub const fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 }
    }

    /// Matrix of a frame turned counterclockwise by `degrees`.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, tx: 0.0, ty: 0.0 }
    }

    /// Rotation of the frame in degrees, counterclockwise positive.
    pub fn rotation_degrees(&self) -> f64 {
        -self.c.atan2(self.d).to_degrees()
    }
}

/// Shapes that can be moved rigidly in the document plane.
pub trait Transform: Sized {
    fn translated(&self, dx: f64, dy: f64) -> Self;

    /// Rotate about the document origin.
    fn rotated(&self, degrees: f64) -> Self;
}

impl Transform for Point {
    fn translated(&self, dx: f64, dy: f64) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }

    fn rotated(&self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Rotate `shape` about `pivot`.
///
/// Order is fixed: move the pivot to the origin, rotate, move back.
pub fn rotate_about<T: Transform>(shape: &T, pivot: Point, degrees: f64) -> T {
    shape
        .translated(-pivot.x, -pivot.y)
        .rotated(degrees)
        .translated(pivot.x, pivot.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_close(a: Point, b: Point) {
        assert!(a.distance(&b) < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_rotate_about_origin() {
        let p = Point::new(1.0, 0.0).rotated(90.0);
        assert_point_close(p, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_rotate_about_pivot() {
        let pivot = Point::new(10.0, 10.0);
        let p = rotate_about(&Point::new(12.0, 10.0), pivot, 90.0);
        assert_point_close(p, Point::new(10.0, 12.0));

        // The pivot itself never moves
        assert_point_close(rotate_about(&pivot, pivot, 37.0), pivot);
    }

    #[test]
    fn test_rotate_and_back() {
        let pivot = Point::new(-3.5, 42.0);
        let p = Point::new(100.0, -7.25);
        for theta in [0.0, 15.0, 90.0, 180.0, 271.3, -45.0] {
            let back = rotate_about(&rotate_about(&p, pivot, theta), pivot, -theta);
            assert_point_close(back, p);
        }
    }

    #[test]
    fn test_matrix_rotation_roundtrip() {
        for theta in [0.0, 30.0, 90.0, -90.0, 135.0] {
            let m = TextMatrix::rotation(theta);
            assert!((m.rotation_degrees() - theta).abs() < EPS);
        }
        assert_eq!(TextMatrix::identity().rotation_degrees(), 0.0);
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(0.0, 10.0, 5.0, 0.0);
        let b = Bounds::new(-2.0, 3.0, 4.0, -6.0);
        let u = a.union(&b);
        assert_eq!(u, Bounds::new(-2.0, 10.0, 5.0, -6.0));
        assert_eq!(u.width(), 7.0);
        assert_eq!(u.height(), 16.0);
    }
}
