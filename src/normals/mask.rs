//! Precomputed "increasing" neighbour mask.
//!
//! Offsets are grouped in square rings of growing Chebyshev distance
//! (`step, 2·step, …` up to the radius). Every entry records the nearest entry
//! of the previous ring along the ray toward the centre, its *parent*. The
//! estimator admits an entry only when its parent was admitted, which limits
//! the neighbourhood to pixels reachable in a straight line without crossing
//! an edge or a depth jump.
//!
//! The mask depends only on `(width, radius, step)` and is cached across
//! frames by [`MaskCache`].

use log::debug;

/// One neighbour offset of a [`NeighborMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskEntry {
    pub dx: isize,
    pub dy: isize,
    /// Linear index delta `dy·width + dx` for the width the mask was built for.
    pub delta: isize,
    /// Ring number, starting at 1 for the innermost ring.
    pub ring: usize,
    /// Index of the parent entry; `None` on the first ring (parent = centre).
    pub parent: Option<usize>,
}

/// Neighbour offsets ordered ring by ring, so parents precede their children.
#[derive(Clone, Debug)]
pub struct NeighborMask {
    width: usize,
    radius: usize,
    step: usize,
    entries: Vec<MaskEntry>,
}

impl NeighborMask {
    pub fn new(width: usize, radius: usize, step: usize) -> Self {
        let step = step.max(1);
        let rings = radius / step;
        let side = 2 * rings + 1;
        // Dense lookup (in ring units) from offset to entry index.
        let mut lookup: Vec<Option<usize>> = vec![None; side * side];
        let slot = |ix: isize, iy: isize| -> usize {
            (iy + rings as isize) as usize * side + (ix + rings as isize) as usize
        };
        let mut entries = Vec::with_capacity(side * side - 1);
        for ring in 1..=rings as isize {
            for iy in -ring..=ring {
                for ix in -ring..=ring {
                    if ix.abs().max(iy.abs()) != ring {
                        continue;
                    }
                    let parent = if ring == 1 {
                        None
                    } else {
                        let scale = (ring - 1) as f32 / ring as f32;
                        let px = (ix as f32 * scale).round() as isize;
                        let py = (iy as f32 * scale).round() as isize;
                        lookup[slot(px, py)]
                    };
                    let dx = ix * step as isize;
                    let dy = iy * step as isize;
                    lookup[slot(ix, iy)] = Some(entries.len());
                    entries.push(MaskEntry {
                        dx,
                        dy,
                        delta: dy * width as isize + dx,
                        ring: ring as usize,
                        parent,
                    });
                }
            }
        }
        Self {
            width,
            radius,
            step,
            entries,
        }
    }

    #[inline]
    pub fn entries(&self) -> &[MaskEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the mask was built for this key.
    pub fn matches(&self, width: usize, radius: usize, step: usize) -> bool {
        self.width == width && self.radius == radius && self.step == step.max(1)
    }
}

/// Cache holding the mask for the most recent `(width, radius, step)` key.
#[derive(Debug, Default)]
pub struct MaskCache {
    mask: Option<NeighborMask>,
    builds: usize,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask for the key, rebuilt only when the key changed.
    pub fn get_or_build(&mut self, width: usize, radius: usize, step: usize) -> &NeighborMask {
        let stale = !self
            .mask
            .as_ref()
            .is_some_and(|m| m.matches(width, radius, step));
        if stale {
            let mask = NeighborMask::new(width, radius, step);
            debug!(
                "MaskCache rebuild width={} radius={} step={} entries={}",
                width,
                radius,
                step,
                mask.len()
            );
            self.builds += 1;
            self.mask = Some(mask);
        }
        self.mask.get_or_insert_with(|| NeighborMask::new(width, radius, step))
    }

    /// Number of masks built so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
