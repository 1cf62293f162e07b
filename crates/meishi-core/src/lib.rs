//! meishi-core - Core library for meishi.
//!
//! This crate turns the OCR output of a photo containing one or more business
//! cards into one structured contact record per card: blocks are grouped by
//! spatial density, filtered by card shape, and each group's text is run
//! through pattern-based field extraction.
//!
//! # Example
//!
//! ```ignore
//! use meishi_core::{CardPipeline, MeishiConfig};
//!
//! let config = MeishiConfig::from_env();
//! let pipeline = CardPipeline::new(backend, &config)?;
//!
//! let outcome = pipeline.scan(&photo_bytes).await?;
//! for record in outcome.records() {
//!     println!("{:?} / {:?}", record.name, record.company);
//! }
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use cluster::{Cluster, ClusterConfig, ClusterSet, ClusteringEngine};
pub use config::MeishiConfig;
pub use error::{ErrorCode, MeishiError, MeishiResult};
pub use extract::{ExtractionConfig, FieldExtractor, Vocabulary};
pub use pipeline::CardPipeline;
pub use store::InMemoryCardStore;
pub use traits::{CardStore, DetectionFeature, OcrBackend, OcrConfig, OcrProvider, StoredCard};
pub use types::{BoundingBox, ContactRecord, ImageFormat, Point, ScanOutcome, TextBlock};
