//! meishi-ocr - OCR backend implementations for meishi.
//!
//! Backends implement [`OcrBackend`] and turn an image into positioned text
//! blocks for the card pipeline.
//!
//! # Supported Backends
//!
//! - **Google Vision** (feature: `google`) - Cloud Vision `images:annotate`
//!   with document text detection

mod factory;

#[cfg(feature = "google")]
mod annotation;
#[cfg(feature = "google")]
mod google;

pub use factory::OcrFactory;

#[cfg(feature = "google")]
pub use annotation::ImageAnnotation;
#[cfg(feature = "google")]
pub use google::GoogleVisionOcr;

// Re-export core types
pub use meishi_core::traits::{DetectionFeature, OcrBackend, OcrConfig, OcrProvider};
