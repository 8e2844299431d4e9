//! Canvas geometry primitives.
//!
//! All coordinates are canvas pixels with the y axis pointing down, exactly
//! as the editor reports them. No unit conversion happens anywhere in the
//! physics core.

use serde::{Deserialize, Serialize};

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Same point shifted horizontally by `dx`.
    pub fn offset_x(&self, dx: f64) -> Self {
        Self::new(self.x + dx, self.y)
    }
}

/// Width × height of an element's box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub origin: Point,
    pub size: Size,
}

impl Bounds {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Midpoint of the left edge.
    pub fn left_mid(&self) -> Point {
        Point::new(self.origin.x, self.origin.y + self.size.height / 2.0)
    }

    /// Midpoint of the right edge.
    pub fn right_mid(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height / 2.0,
        )
    }
}
