use crate::ids::WallId;
use crate::sense::SenseKind;
use cover_geometry::{Point2, Segment};
use serde::{Deserialize, Serialize};

/// Per-restriction-type visibility class (spec §3 `Wall`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallClass {
    Opaque,
    /// Also called "terrain": partial occlusion, two overlapping terrain
    /// walls together act as a full wall (glossary).
    Limited,
    Open,
    Directional,
}

/// An open-ended elevation band: `None` means unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationBand {
    pub bottom: Option<f32>,
    pub top: Option<f32>,
}

impl ElevationBand {
    pub const UNBOUNDED: Self = Self {
        bottom: None,
        top: None,
    };

    pub fn contains(&self, z: f32) -> bool {
        self.bottom.is_none_or(|b| z >= b) && self.top.is_none_or(|t| z <= t)
    }

    pub fn overlaps(&self, other_bottom: f32, other_top: f32) -> bool {
        let below_all = self.top.is_some_and(|t| t < other_bottom);
        let above_all = self.bottom.is_some_and(|b| b > other_top);
        !below_all && !above_all
    }
}

/// A wall segment, per-sense-kind blocking behavior, and (for directional
/// walls) the side it blocks from (spec §3 `Wall`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    pub segment: Segment,
    pub class: WallClass,
    pub elevation: ElevationBand,
    /// Sense kinds this wall restricts; a sight-only wall does not block
    /// sound, etc.
    pub restricts: Vec<SenseKind>,
    /// For directional walls: only blocks from the side this normal points
    /// towards.
    pub directional_normal: Option<glam::Vec2>,
}

impl Wall {
    pub fn is_degenerate(&self) -> bool {
        self.segment.is_degenerate()
    }

    pub fn restricts_sense(&self, kind: SenseKind) -> bool {
        self.restricts.contains(&kind)
    }

    /// True if `viewer` is on the blocking side of a directional wall (and
    /// thus can have sight obstructed by it). Non-directional walls always
    /// return true.
    pub fn blocks_from(&self, viewer: Point2) -> bool {
        match (self.class, self.directional_normal) {
            (WallClass::Directional, Some(normal)) => {
                let to_viewer = viewer - self.segment.a;
                to_viewer.dot(normal) >= 0.0
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(class: WallClass, normal: Option<glam::Vec2>) -> Wall {
        Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(5.0, 4.0), Point2::new(5.0, 7.0)),
            class,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: normal,
        }
    }

    #[test]
    fn directional_wall_blocks_only_from_normal_side() {
        let w = wall(WallClass::Directional, Some(glam::vec2(-1.0, 0.0)));
        // Viewer west of the wall (matching the normal direction) is blocked.
        assert!(w.blocks_from(Point2::new(1.0, 5.0)));
        // Viewer east of the wall (opposite the normal) is not blocked:
        // spec scenario 4, "directional wall wrong side".
        assert!(!w.blocks_from(Point2::new(9.0, 5.0)));
    }

    #[test]
    fn elevation_band_unbounded_contains_everything() {
        assert!(ElevationBand::UNBOUNDED.contains(1000.0));
        assert!(ElevationBand::UNBOUNDED.contains(-1000.0));
    }
}
