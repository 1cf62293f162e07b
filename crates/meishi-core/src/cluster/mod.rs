//! Card segmentation: grouping OCR blocks into one cluster per physical card.
//!
//! The neighbourhood radius is derived from the spread of the blocks, so the
//! same settings work for a close-up of one card and for a wide shot of
//! several cards laid out on a table. Candidate groups are then filtered by
//! silhouette: a business card's bounding box is roughly 1:1.6 in either
//! orientation, so groups far outside that are discarded.

mod dbscan;

pub use dbscan::density_components;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{BoundingBox, TextBlock};

/// Clustering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Neighbourhood radius as a fraction of the smaller block extent.
    pub radius_fraction: f32,
    /// Radius in pixels used when the adaptive radius collapses to zero.
    pub fallback_radius: f32,
    /// Smallest accepted width/height ratio of a cluster.
    pub min_aspect_ratio: f32,
    /// Largest accepted width/height ratio of a cluster.
    pub max_aspect_ratio: f32,
    /// Maximum number of cards returned per photo.
    pub max_clusters: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_fraction: 0.15,
            fallback_radius: 50.0,
            min_aspect_ratio: 0.5,
            max_aspect_ratio: 4.0,
            max_clusters: 9,
        }
    }
}

/// Blocks believed to belong to one physical card, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    blocks: Vec<TextBlock>,
    bounds: BoundingBox,
}

impl Cluster {
    /// Build a cluster, sorting its blocks top-to-bottom (ties left-to-right).
    ///
    /// Returns `None` for an empty block list.
    pub fn new(mut blocks: Vec<TextBlock>) -> Option<Self> {
        blocks.sort_by_key(|b| (OrderedFloat(b.min_corner.y), OrderedFloat(b.min_corner.x)));
        let bounds = blocks
            .iter()
            .map(TextBlock::bounds)
            .reduce(|acc, b| acc.union(&b))?;
        Some(Self { blocks, bounds })
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Bounding-box width divided by height (`None` when the height is zero).
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.bounds.aspect_ratio()
    }

    /// Block texts joined in reading order, one block per line group.
    pub fn full_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn reading_key(&self) -> (OrderedFloat<f32>, OrderedFloat<f32>) {
        (OrderedFloat(self.bounds.min.y), OrderedFloat(self.bounds.min.x))
    }
}

/// Accepted clusters plus diagnostics about how they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSet {
    /// Accepted clusters in reading order, capped at `max_clusters`.
    pub clusters: Vec<Cluster>,
    /// Number of candidate groups before the aspect-ratio filter.
    pub candidates: usize,
    /// Number of candidate groups discarded by the aspect-ratio filter.
    pub rejected: usize,
    /// Neighbourhood radius used, or `None` when clustering was bypassed.
    pub radius: Option<f32>,
}

impl ClusterSet {
    fn empty() -> Self {
        Self {
            clusters: Vec::new(),
            candidates: 0,
            rejected: 0,
            radius: None,
        }
    }
}

/// Groups OCR blocks into per-card clusters.
#[derive(Debug, Clone, Default)]
pub struct ClusteringEngine {
    config: ClusterConfig,
}

impl ClusteringEngine {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Neighbourhood radius for a set of blocks.
    ///
    /// Fraction of the smaller of the overall horizontal and vertical extents,
    /// falling back to the fixed radius when that is not positive.
    pub fn radius_for(&self, blocks: &[TextBlock]) -> f32 {
        let extent = blocks
            .iter()
            .map(TextBlock::bounds)
            .reduce(|acc, b| acc.union(&b))
            .map(|b| b.width().min(b.height()))
            .unwrap_or(0.0);

        let radius = extent * self.config.radius_fraction;
        if radius > 0.0 && radius.is_finite() {
            radius
        } else {
            self.config.fallback_radius
        }
    }

    fn accepts(&self, cluster: &Cluster) -> bool {
        cluster.aspect_ratio().is_some_and(|ratio| {
            ratio >= self.config.min_aspect_ratio && ratio <= self.config.max_aspect_ratio
        })
    }

    /// Partition blocks into accepted card clusters.
    ///
    /// Rejected candidate groups are dropped together with their blocks.
    pub fn cluster(&self, blocks: Vec<TextBlock>) -> ClusterSet {
        match blocks.len() {
            0 => return ClusterSet::empty(),
            1 => {
                return ClusterSet {
                    clusters: Cluster::new(blocks).into_iter().collect(),
                    candidates: 1,
                    rejected: 0,
                    radius: None,
                }
            }
            _ => {}
        }

        let radius = self.radius_for(&blocks);
        let centroids: Vec<_> = blocks.iter().map(|b| b.centroid).collect();
        let components = density_components(&centroids, radius);
        let candidates = components.len();

        let mut slots: Vec<Option<TextBlock>> = blocks.into_iter().map(Some).collect();
        let mut accepted = Vec::new();
        let mut rejected = 0;

        for members in components {
            let group: Vec<TextBlock> = members
                .into_iter()
                .filter_map(|i| slots[i].take())
                .collect();
            let Some(cluster) = Cluster::new(group) else {
                continue;
            };

            if self.accepts(&cluster) {
                accepted.push(cluster);
            } else {
                debug!(
                    blocks = cluster.len(),
                    aspect_ratio = ?cluster.aspect_ratio(),
                    "Discarding cluster outside card aspect range"
                );
                rejected += 1;
            }
        }

        accepted.sort_by_key(Cluster::reading_key);
        accepted.truncate(self.config.max_clusters);

        debug!(
            radius,
            candidates,
            rejected,
            accepted = accepted.len(),
            "Clustered text blocks"
        );

        ClusterSet {
            clusters: accepted,
            candidates,
            rejected,
            radius: Some(radius),
        }
    }
}
