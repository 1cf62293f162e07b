//! Result of scanning one photo.

use serde::{Deserialize, Serialize};

use super::record::ContactRecord;

/// Outcome of a successful scan.
///
/// Backend failures are reported as errors; the empty variants below are
/// legitimate results that callers should word differently to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// At least one card produced a usable record.
    Cards { records: Vec<ContactRecord> },
    /// The OCR backend found no text at all.
    NoTextDetected,
    /// Text was found but no block group had a card-like shape.
    NoClustersAccepted { blocks: usize },
    /// Card-shaped groups were found but none yielded a name, company or email.
    NoUsableFields { clusters: usize },
}

impl ScanOutcome {
    /// Records produced by the scan (empty for the non-card outcomes).
    pub fn records(&self) -> &[ContactRecord] {
        match self {
            Self::Cards { records } => records,
            _ => &[],
        }
    }

    pub fn into_records(self) -> Vec<ContactRecord> {
        match self {
            Self::Cards { records } => records,
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Stable machine-readable status string.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Cards { .. } => "cards",
            Self::NoTextDetected => "no_text_detected",
            Self::NoClustersAccepted { .. } => "no_clusters_accepted",
            Self::NoUsableFields { .. } => "no_usable_fields",
        }
    }
}
