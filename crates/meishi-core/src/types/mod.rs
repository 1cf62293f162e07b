//! Core data types.

mod block;
mod geometry;
mod image;
mod outcome;
mod record;

pub use block::TextBlock;
pub use geometry::{BoundingBox, Point};
pub use image::ImageFormat;
pub use outcome::ScanOutcome;
pub use record::ContactRecord;
