//! OCR text blocks.

use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, Point};

/// One OCR-reported text region with its pixel-space geometry.
///
/// Blocks are immutable once created; clustering only reorders and groups them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Recognised text, with line breaks where the OCR backend detected them.
    pub text: String,
    pub centroid: Point,
    pub min_corner: Point,
    pub max_corner: Point,
    pub width: f32,
    pub height: f32,
}

impl TextBlock {
    /// Create a block from its text and axis-aligned bounds.
    pub fn new(text: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            text: text.into(),
            centroid: bounds.center(),
            min_corner: bounds.min,
            max_corner: bounds.max,
            width: bounds.width(),
            height: bounds.height(),
        }
    }

    /// Create a block from a rectangle given as `(x, y, width, height)`.
    pub fn from_rect(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            text,
            BoundingBox::new(Point::new(x, y), Point::new(x + width, y + height)),
        )
    }

    /// Create a block from polygon vertices, or `None` if there are none.
    pub fn from_vertices(text: impl Into<String>, vertices: &[Point]) -> Option<Self> {
        BoundingBox::from_vertices(vertices).map(|bounds| Self::new(text, bounds))
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            min: self.min_corner,
            max: self.max_corner,
        }
    }
}
