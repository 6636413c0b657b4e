use serde::Serialize;
use std::fmt;

/// Stable cluster identifier, assigned in discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClusterId(pub u32);

impl ClusterId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Label of a single pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PixelLabel {
    /// Has a normal, not yet assigned to a cluster.
    Valid,
    /// On a depth discontinuity.
    Edge,
    /// No point or no usable normal.
    Invalid,
    /// Outside the working depth range; handled like invalid.
    Skipped,
    Cluster(ClusterId),
}

impl PixelLabel {
    #[inline]
    pub fn cluster(self) -> Option<ClusterId> {
        match self {
            PixelLabel::Cluster(id) => Some(id),
            _ => None,
        }
    }
}

/// Pixel counts per label kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelHistogram {
    pub valid: usize,
    pub edge: usize,
    pub invalid: usize,
    pub skipped: usize,
    pub clustered: usize,
}

/// Per-pixel labels of one frame.
///
/// Read access is public; mutation is reserved to the segmentation module so
/// labels and cluster aggregates cannot drift apart.
#[derive(Clone, Debug)]
pub struct LabelMap {
    width: usize,
    height: usize,
    labels: Vec<PixelLabel>,
}

impl LabelMap {
    pub(crate) fn from_labels(width: usize, height: usize, labels: Vec<PixelLabel>) -> Self {
        assert_eq!(labels.len(), width * height, "label count must equal w*h");
        Self {
            width,
            height,
            labels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> PixelLabel {
        self.labels[idx]
    }

    #[inline]
    pub fn cluster_at(&self, idx: usize) -> Option<ClusterId> {
        self.labels[idx].cluster()
    }

    #[inline]
    pub fn as_slice(&self) -> &[PixelLabel] {
        &self.labels
    }

    pub fn histogram(&self) -> LabelHistogram {
        let mut hist = LabelHistogram::default();
        for label in &self.labels {
            match label {
                PixelLabel::Valid => hist.valid += 1,
                PixelLabel::Edge => hist.edge += 1,
                PixelLabel::Invalid => hist.invalid += 1,
                PixelLabel::Skipped => hist.skipped += 1,
                PixelLabel::Cluster(_) => hist.clustered += 1,
            }
        }
        hist
    }

    /// True when pixel `idx` has a 4-neighbour outside the grid or with a
    /// different label.
    pub fn is_region_border(&self, idx: usize) -> bool {
        let (x, y) = (idx % self.width, idx / self.width);
        let label = self.labels[idx];
        if x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height {
            return true;
        }
        [idx - self.width, idx - 1, idx + 1, idx + self.width]
            .into_iter()
            .any(|j| self.labels[j] != label)
    }

    #[inline]
    pub(super) fn set(&mut self, idx: usize, label: PixelLabel) {
        self.labels[idx] = label;
    }
}
