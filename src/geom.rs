#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in canvas coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box with non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Box spanned by two opposite corners, in either drag direction.
    #[must_use]
    pub fn from_corners(anchor: Point, cursor: Point) -> Self {
        Self {
            x: anchor.x.min(cursor.x),
            y: anchor.y.min(cursor.y),
            width: (cursor.x - anchor.x).abs(),
            height: (cursor.y - anchor.y).abs(),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Whether `pt` lies inside the box grown by `pad` on every side.
    #[must_use]
    pub fn contains_padded(&self, pt: Point, pad: f64) -> bool {
        pt.x >= self.x - pad && pt.x <= self.x + self.width + pad && pt.y >= self.y - pad && pt.y <= self.y + self.height + pad
    }
}

/// Shortest distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn segment_distance(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance(Point { x: a.x + t * dx, y: a.y + t * dy })
}
