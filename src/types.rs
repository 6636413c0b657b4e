use serde::Serialize;
use std::fmt;

/// Geometric type assigned to a cluster by the classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceType {
    Planar,
    /// Bulging toward the sensor.
    Convex,
    /// Hollow as seen from the sensor.
    Concave,
    /// Narrow rim whose curvature concentrates on the cluster border.
    Edge,
    #[default]
    Undefined,
}

impl SurfaceType {
    pub const ALL: [SurfaceType; 5] = [
        SurfaceType::Planar,
        SurfaceType::Convex,
        SurfaceType::Concave,
        SurfaceType::Edge,
        SurfaceType::Undefined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceType::Planar => "planar",
            SurfaceType::Convex => "convex",
            SurfaceType::Concave => "concave",
            SurfaceType::Edge => "edge",
            SurfaceType::Undefined => "undefined",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of clusters per surface type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceHistogram {
    pub planar: usize,
    pub convex: usize,
    pub concave: usize,
    pub edge: usize,
    pub undefined: usize,
}

impl SurfaceHistogram {
    pub fn add(&mut self, surface: SurfaceType) {
        match surface {
            SurfaceType::Planar => self.planar += 1,
            SurfaceType::Convex => self.convex += 1,
            SurfaceType::Concave => self.concave += 1,
            SurfaceType::Edge => self.edge += 1,
            SurfaceType::Undefined => self.undefined += 1,
        }
    }

    pub fn get(&self, surface: SurfaceType) -> usize {
        match surface {
            SurfaceType::Planar => self.planar,
            SurfaceType::Convex => self.convex,
            SurfaceType::Concave => self.concave,
            SurfaceType::Edge => self.edge,
            SurfaceType::Undefined => self.undefined,
        }
    }

    pub fn total(&self) -> usize {
        SurfaceType::ALL.iter().map(|&s| self.get(s)).sum()
    }
}

impl FromIterator<SurfaceType> for SurfaceHistogram {
    fn from_iter<I: IntoIterator<Item = SurfaceType>>(iter: I) -> Self {
        let mut hist = Self::default();
        for surface in iter {
            hist.add(surface);
        }
        hist
    }
}
