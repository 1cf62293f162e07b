//! Pixel-space geometry shared by OCR blocks and card clusters.

use serde::{Deserialize, Serialize};

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Create a box from two corners, normalising their order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box enclosing every vertex of a polygon.
    ///
    /// Returns `None` for an empty polygon.
    pub fn from_vertices(vertices: &[Point]) -> Option<Self> {
        let first = vertices.first()?;
        let init = BoundingBox::new(*first, *first);
        Some(vertices[1..].iter().fold(init, |acc, p| acc.include(*p)))
    }

    fn include(self, p: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> Self {
        self.include(other.min).include(other.max)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Width divided by height, or `None` for a zero-height box.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let height = self.height();
        if height <= 0.0 {
            None
        } else {
            Some(self.width() / height)
        }
    }
}
