use cover_geometry::{Point3, Rect};

/// The 3D convex region between a viewer eye-point and a target's bounding
/// volume, used to filter candidate blockers (spec §3 `Frustum`). Includes
/// both endpoints.
///
/// The obstacle index's contract only requires no false negatives (spec
/// §4.2), so [`Frustum::bounding_aabb`] is deliberately a conservative
/// over-approximation — the enclosing axis-aligned box of the apex and the
/// target volume's eight corners — rather than the tight pyramid hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub apex: Point3,
    pub target_footprint: Rect,
    pub target_z_bottom: f32,
    pub target_z_top: f32,
}

impl Frustum {
    pub fn new(apex: Point3, target_footprint: Rect, target_z_bottom: f32, target_z_top: f32) -> Self {
        Self {
            apex,
            target_footprint,
            target_z_bottom,
            target_z_top,
        }
    }

    pub fn bounding_aabb(&self) -> (Point3, Point3) {
        let min_x = self.apex.0.x.min(self.target_footprint.min.x());
        let max_x = self.apex.0.x.max(self.target_footprint.max.x());
        let min_y = self.apex.0.y.min(self.target_footprint.min.y());
        let max_y = self.apex.0.y.max(self.target_footprint.max.y());
        let min_z = self.apex.0.z.min(self.target_z_bottom);
        let max_z = self.apex.0.z.max(self.target_z_top);
        (
            Point3::new(min_x, min_y, min_z),
            Point3::new(max_x, max_y, max_z),
        )
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        let (min, max) = self.bounding_aabb();
        p.0.x >= min.0.x
            && p.0.x <= max.0.x
            && p.0.y >= min.0.y
            && p.0.y <= max.0.y
            && p.0.z >= min.0.z
            && p.0.z <= max.0.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::Point2;

    #[test]
    fn bounding_aabb_includes_apex_and_target_volume() {
        let frustum = Frustum::new(
            Point3::new(0.0, 0.0, 0.0),
            Rect::from_min_max(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0)),
            0.0,
            2.0,
        );
        assert!(frustum.contains_point(Point3::new(0.0, 0.0, 0.0)));
        assert!(frustum.contains_point(Point3::new(5.5, 5.5, 1.0)));
        assert!(!frustum.contains_point(Point3::new(100.0, 100.0, 100.0)));
    }
}
