use crate::point::Point2;
use serde::{Deserialize, Serialize};

/// Cohen-Sutherland half-plane outcodes.
mod outcode {
    pub const INSIDE: u8 = 0;
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const BOTTOM: u8 = 1 << 2;
    pub const TOP: u8 = 1 << 3;
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    pub fn from_min_max(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extent(center: Point2, half_extent: glam::Vec2) -> Self {
        Self {
            min: Point2(center.0 - half_extent),
            max: Point2(center.0 + half_extent),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f32 {
        self.max.y() - self.min.y()
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2 {
        self.min.lerp(self.max, 0.5)
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x() >= self.min.x() && p.x() <= self.max.x() && p.y() >= self.min.y() && p.y() <= self.max.y()
    }

    pub fn intersects_rect(&self, other: &Rect) -> bool {
        self.min.x() <= other.max.x()
            && self.max.x() >= other.min.x()
            && self.min.y() <= other.max.y()
            && self.max.y() >= other.min.y()
    }

    /// Rect with `min`/`max` swapped into canonical order, for callers that
    /// build a rect from two arbitrary corners (e.g. a wall segment's
    /// endpoints) rather than an already-sorted min/max pair.
    pub fn normalized(&self) -> Self {
        Self {
            min: Point2::new(self.min.x().min(self.max.x()), self.min.y().min(self.max.y())),
            max: Point2::new(self.min.x().max(self.max.x()), self.min.y().max(self.max.y())),
        }
    }

    pub fn union(&self, other: &Rect) -> Self {
        Self {
            min: Point2::new(self.min.x().min(other.min.x()), self.min.y().min(other.min.y())),
            max: Point2::new(self.max.x().max(other.max.x()), self.max.y().max(other.max.y())),
        }
    }

    pub fn corners(&self) -> [Point2; 4] {
        [
            self.min,
            Point2::new(self.max.x(), self.min.y()),
            self.max,
            Point2::new(self.min.x(), self.max.y()),
        ]
    }

    fn outcode(&self, p: Point2) -> u8 {
        let mut code = outcode::INSIDE;
        if p.x() < self.min.x() {
            code |= outcode::LEFT;
        } else if p.x() > self.max.x() {
            code |= outcode::RIGHT;
        }
        if p.y() < self.min.y() {
            code |= outcode::BOTTOM;
        } else if p.y() > self.max.y() {
            code |= outcode::TOP;
        }
        code
    }

    /// `lineSegmentIntersectsRect` from spec §4.1: Cohen-Sutherland outcodes
    /// with both-endpoints-outside-same-half rejection, else full edge
    /// tests. If `inside` is true, a segment wholly inside the rect counts
    /// as intersecting.
    pub fn line_segment_intersects(&self, a: Point2, b: Point2, inside: bool) -> bool {
        let oa = self.outcode(a);
        let ob = self.outcode(b);

        if oa & ob != 0 {
            // Both endpoints share an "outside" half-plane: trivially reject.
            return false;
        }
        if oa == outcode::INSIDE && ob == outcode::INSIDE {
            return inside;
        }

        // At least one endpoint is outside and they don't share a rejecting
        // half-plane: fall back to explicit edge intersection tests.
        for (c, d) in self.edges() {
            if crate::segment::line_segment_intersects(a, b, c, d, true) {
                return true;
            }
        }
        // One endpoint could be exactly on the boundary while the segment
        // never crosses an edge (e.g. touching a corner) - still counts.
        self.contains_point(a) || self.contains_point(b)
    }

    fn edges(&self) -> [(Point2, Point2); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }
}
