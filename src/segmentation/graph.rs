use super::cluster::Cluster;
use super::labels::{ClusterId, LabelMap, PixelLabel};
use crate::angle::angle_between_normals;
use crate::curvature::CurvatureStats;
use crate::types::SurfaceType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Adjacency between two clusters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEdge {
    /// Angle (radians) between the two clusters' mean normals.
    pub weight: f32,
    /// Number of 4-adjacent pixel pairs along the shared boundary.
    pub pair_count: usize,
    /// Sum over those pairs of the cosine between the pixel normals.
    pub cos_sum: f64,
}

impl ClusterEdge {
    /// Mean normal agreement across the boundary, `-1.0` without pairs.
    pub fn mean_boundary_cos(&self) -> f32 {
        if self.pair_count == 0 {
            -1.0
        } else {
            (self.cos_sum / self.pair_count as f64) as f32
        }
    }
}

/// Cluster arena with union-find tombstones and an ordered adjacency map.
///
/// Ids index the arena in discovery order. A merged-away cluster leaves a
/// tombstone whose parent points to the survivor, so stale ids keep resolving
/// through [`ClusterGraph::find`]. Edge keys are `(a, b)` with `a < b`, both
/// live.
#[derive(Clone, Debug, Default)]
pub struct ClusterGraph {
    nodes: Vec<Option<Cluster>>,
    parent: Vec<ClusterId>,
    edges: BTreeMap<(ClusterId, ClusterId), ClusterEdge>,
}

#[inline]
fn edge_key(a: ClusterId, b: ClusterId) -> (ClusterId, ClusterId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ClusterGraph {
    pub(super) fn from_clusters(clusters: Vec<Cluster>) -> Self {
        let parent = clusters.iter().map(|c| c.id).collect();
        Self {
            nodes: clusters.into_iter().map(Some).collect(),
            parent,
            edges: BTreeMap::new(),
        }
    }

    /// Number of ids ever issued, tombstones included.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live clusters.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live cluster with this id, `None` for tombstones or unknown ids.
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Live clusters in id order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.nodes.iter().filter_map(Option::as_ref)
    }

    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        self.clusters().map(|c| c.id).collect()
    }

    /// Representative of `id` after any number of merges.
    pub fn find(&self, id: ClusterId) -> ClusterId {
        let mut cur = id;
        while self.parent[cur.index()] != cur {
            cur = self.parent[cur.index()];
        }
        cur
    }

    fn find_compress(&mut self, id: ClusterId) -> ClusterId {
        let root = self.find(id);
        let mut cur = id;
        while self.parent[cur.index()] != root {
            let next = self.parent[cur.index()];
            self.parent[cur.index()] = root;
            cur = next;
        }
        root
    }

    pub fn edge(&self, a: ClusterId, b: ClusterId) -> Option<&ClusterEdge> {
        self.edges.get(&edge_key(a, b))
    }

    /// All edges in key order.
    pub fn edges(&self) -> impl Iterator<Item = (ClusterId, ClusterId, &ClusterEdge)> {
        self.edges.iter().map(|(&(a, b), e)| (a, b, e))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Live neighbours of `id`, ascending.
    pub fn neighbors(&self, id: ClusterId) -> Vec<ClusterId> {
        let mut out: Vec<ClusterId> = self
            .edges
            .keys()
            .filter_map(|&(a, b)| {
                if a == id {
                    Some(b)
                } else if b == id {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    pub(super) fn add_pair(&mut self, a: ClusterId, b: ClusterId, pair_cos: f32) {
        debug_assert_ne!(a, b);
        let entry = self.edges.entry(edge_key(a, b)).or_insert(ClusterEdge {
            weight: 0.0,
            pair_count: 0,
            cos_sum: 0.0,
        });
        entry.pair_count += 1;
        entry.cos_sum += pair_cos as f64;
    }

    /// Recompute every edge weight from the current mean normals.
    pub(super) fn update_weights(&mut self) {
        let nodes = &self.nodes;
        for (&(a, b), edge) in self.edges.iter_mut() {
            let (Some(ca), Some(cb)) = (&nodes[a.index()], &nodes[b.index()]) else {
                panic!("edge ({a}, {b}) references a removed cluster");
            };
            edge.weight = angle_between_normals(&ca.mean_normal(), &cb.mean_normal());
        }
    }

    /// Recompute the border list of every live cluster.
    pub fn refresh_borders(&mut self, labels: &LabelMap) {
        for cluster in self.nodes.iter_mut().flatten() {
            cluster.border = cluster
                .pixels
                .iter()
                .copied()
                .filter(|&idx| labels.is_region_border(idx))
                .collect();
        }
    }

    pub fn set_curvature(&mut self, id: ClusterId, stats: CurvatureStats) {
        self.live_mut(id).curvature = stats;
    }

    pub fn set_surface(&mut self, id: ClusterId, surface: SurfaceType) {
        self.live_mut(id).surface = surface;
    }

    fn live_mut(&mut self, id: ClusterId) -> &mut Cluster {
        match self.nodes.get_mut(id.index()).and_then(Option::as_mut) {
            Some(c) => c,
            None => panic!("cluster {id} is not live"),
        }
    }

    /// Merge the clusters containing `a` and `b`, relabelling pixels in
    /// `labels`. Returns the survivor (the larger cluster, lower id on ties).
    ///
    /// Edges of the absorbed cluster are rewired to the survivor; parallel
    /// edges keep the smaller weight and add up their pair statistics. The
    /// survivor's curvature and border are stale afterwards.
    pub fn merge(&mut self, labels: &mut LabelMap, a: ClusterId, b: ClusterId) -> ClusterId {
        let ra = self.find_compress(a);
        let rb = self.find_compress(b);
        if ra == rb {
            return ra;
        }
        let len_a = self.live_mut(ra).len();
        let len_b = self.live_mut(rb).len();
        let (survivor, absorbed) = if len_a > len_b || (len_a == len_b && ra < rb) {
            (ra, rb)
        } else {
            (rb, ra)
        };

        let Some(gone) = self.nodes[absorbed.index()].take() else {
            panic!("cluster {absorbed} is not live");
        };
        for &idx in &gone.pixels {
            labels.set(idx, PixelLabel::Cluster(survivor));
        }
        self.live_mut(survivor).absorb(gone);
        self.parent[absorbed.index()] = survivor;

        let touching: Vec<(ClusterId, ClusterId)> = self
            .edges
            .keys()
            .copied()
            .filter(|&(x, y)| x == absorbed || y == absorbed)
            .collect();
        for key in touching {
            let Some(edge) = self.edges.remove(&key) else {
                continue;
            };
            let other = if key.0 == absorbed { key.1 } else { key.0 };
            if other == survivor {
                continue;
            }
            self.edges
                .entry(edge_key(survivor, other))
                .and_modify(|e| {
                    e.weight = e.weight.min(edge.weight);
                    e.pair_count += edge.pair_count;
                    e.cos_sum += edge.cos_sum;
                })
                .or_insert(edge);
        }
        survivor
    }
}
