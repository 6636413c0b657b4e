//! Graph-based region growing over the normal map.
//!
//! The grower partitions the valid pixels into connected clusters of
//! consistent orientation and records how the clusters touch:
//!
//! - Seeds are the unvisited valid pixels in row-major order. Growth is a
//!   breadth-first search over 4-neighbours in the fixed order up, left,
//!   right, down, so ids and partitions are deterministic.
//! - A neighbour joins when `cos(n_pixel, mean_normal) ≥ same_direction_cos`,
//!   where the mean normal is the running normalized sum of the member
//!   normals. Edge pixels never join, and invalid or skipped pixels carry no
//!   normal to compare.
//! - After growth every right/down pixel pair straddling two clusters adds one
//!   boundary pair to the [`ClusterGraph`] edge of those clusters, unless the
//!   depth jump between the two pixels is a discontinuity. Edges keep the
//!   pair count and the summed pair cosine so later stages can judge boundary
//!   smoothness; their weight is the angle between the mean normals.
//!
//! The [`LabelMap`] and the clusters are only mutated from this module: by
//! [`segment`] during growth and by [`ClusterGraph::merge`] afterwards. That
//! keeps cluster pixel lists and pixel labels in agreement.
//!
//! Complexity: every pixel is enqueued at most once, O(W·H).

mod cluster;
mod graph;
mod grower;
mod labels;
mod options;

pub use cluster::{Cluster, PixelBounds};
pub use graph::{ClusterEdge, ClusterGraph};
pub use grower::segment;
pub use labels::{ClusterId, LabelHistogram, LabelMap, PixelLabel};
pub use options::SegmentationOptions;

#[cfg(test)]
mod tests;
