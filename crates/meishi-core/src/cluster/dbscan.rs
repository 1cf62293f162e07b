//! Density grouping of block centroids.
//!
//! With a minimum cluster size of one every point is a core point, so DBSCAN
//! degenerates to the connected components of the graph linking points that
//! lie within `radius` of each other. Union–find computes those components
//! without a noise class.

use petgraph::unionfind::UnionFind;

use crate::types::Point;

/// Group point indices into density-connected components.
///
/// Components are returned in order of their first member, and members keep
/// their input order, so the result is deterministic for a given input.
pub fn density_components(points: &[Point], radius: f32) -> Vec<Vec<usize>> {
    let n = points.len();
    let mut sets: UnionFind<usize> = UnionFind::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            if points[i].distance(&points[j]) <= radius {
                sets.union(i, j);
            }
        }
    }

    let labels = sets.into_labeling();
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut slot_of_label: Vec<Option<usize>> = vec![None; n];

    for (index, label) in labels.into_iter().enumerate() {
        match slot_of_label[label] {
            Some(slot) => components[slot].push(index),
            None => {
                slot_of_label[label] = Some(components.len());
                components.push(vec![index]);
            }
        }
    }

    components
}
