//! Trait definitions for pluggable components.

mod ocr;
mod store;

pub use ocr::{DetectionFeature, OcrBackend, OcrConfig, OcrProvider};
pub use store::{CardStore, StoredCard};
