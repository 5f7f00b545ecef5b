use crate::ids::{CoverEffectId, RegionId};
use crate::wall::ElevationBand;
use cover_geometry::{Point2, Polygon};
use serde::{Deserialize, Serialize};

/// The behavior a region imposes on tokens it contains (spec §3 `Region`,
/// §4.7 "region override").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionBehavior {
    /// The classifier's computed cover set is replaced entirely by this
    /// effect for any target inside the region.
    ForceCover(CoverEffectId),
    /// No behavior; the region exists for host bookkeeping only.
    None,
}

/// A polygonal volume with an elevation band and a named behavior applied to
/// contained tokens (spec §3 `Region`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub shapes: Vec<Polygon>,
    pub elevation: ElevationBand,
    pub behavior: RegionBehavior,
}

impl Region {
    pub fn contains_point(&self, point: Point2, z: f32) -> bool {
        self.elevation.contains(z) && self.shapes.iter().any(|shape| shape.contains_point(point))
    }
}
