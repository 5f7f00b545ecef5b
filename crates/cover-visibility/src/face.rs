use cover_geometry::{HorizontalPlane, Point2, Point3, Polygon, Ray3, VerticalPlane};

/// A viewer-facing face of a token's 3D box: either the horizontal top/
/// bottom cap, or one of the vertical side faces along a footprint edge
/// (spec §4.4.c).
#[derive(Debug, Clone, Copy)]
pub enum Face {
    Horizontal { z: f32 },
    Vertical { a: Point2, b: Point2, z_bottom: f32, z_top: f32 },
}

impl Face {
    pub fn intersect(&self, ray: &Ray3) -> Option<Point3> {
        match self {
            Face::Horizontal { z } => HorizontalPlane { z: *z }.intersect(ray),
            Face::Vertical { a, b, .. } => VerticalPlane { a: *a, b: *b }.intersect(ray),
        }
    }

    /// Maps a 3D point known to lie on this face's plane into the face's own
    /// flattened 2D coordinates, so area/clip operations can reuse
    /// [`Polygon`] rather than a 3D variant.
    pub fn to_local(&self, p: Point3) -> Point2 {
        match self {
            Face::Horizontal { .. } => p.xy(),
            Face::Vertical { a, b, .. } => {
                let edge = *b - *a;
                let len = edge.length().max(f32::EPSILON);
                let dir = edge / len;
                let rel = p.xy() - *a;
                Point2::new(rel.dot(dir), p.0.z)
            }
        }
    }

    /// The face's own boundary, in its local 2D coordinates.
    pub fn local_polygon(&self, footprint: &Polygon) -> Polygon {
        match self {
            Face::Horizontal { .. } => footprint.clone(),
            Face::Vertical { a, b, z_bottom, z_top } => {
                let len = (*b - *a).length();
                Polygon::new(vec![
                    Point2::new(0.0, *z_bottom),
                    Point2::new(len, *z_bottom),
                    Point2::new(len, *z_top),
                    Point2::new(0.0, *z_top),
                ])
            }
        }
    }
}

/// Every outward-facing face of the box spanning `footprint` between
/// `z_bottom` and `z_top`, as seen from `viewer` (spec §4.4.c "viewer-facing
/// faces... depending on viewer altitude relative to the target's elevation
/// band").
pub fn viewer_facing_faces(viewer: Point3, footprint: &Polygon, z_bottom: f32, z_top: f32) -> Vec<Face> {
    let target_center = footprint.bounding_rect().center();
    let mut faces = Vec::new();

    if viewer.0.z > z_top {
        faces.push(Face::Horizontal { z: z_top });
    }
    if viewer.0.z < z_bottom {
        faces.push(Face::Horizontal { z: z_bottom });
    }

    let n = footprint.points.len();
    for i in 0..n {
        let a = footprint.points[i];
        let b = footprint.points[(i + 1) % n];
        let edge = b - a;
        let mut outward = glam::vec2(edge.y, -edge.x).normalize_or_zero();
        let mid = a.lerp(b, 0.5);
        if outward.dot(mid - target_center) < 0.0 {
            outward = -outward;
        }
        let to_viewer = viewer.xy() - mid;
        if outward.dot(to_viewer) > 0.0 {
            faces.push(Face::Vertical { a, b, z_bottom, z_top });
        }
    }
    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn viewer_above_sees_only_top_face_when_centered() {
        let faces = viewer_facing_faces(Point3::new(5.0, 5.0, 100.0), &square(), 0.0, 2.0);
        assert!(faces.iter().any(|f| matches!(f, Face::Horizontal { z } if (*z - 2.0).abs() < 1e-6)));
    }

    #[test]
    fn viewer_to_the_side_sees_the_near_vertical_face_only() {
        let faces = viewer_facing_faces(Point3::new(-100.0, 5.0, 1.0), &square(), 0.0, 2.0);
        let vertical_count = faces.iter().filter(|f| matches!(f, Face::Vertical { .. })).count();
        assert_eq!(vertical_count, 1);
    }

    #[test]
    fn local_polygon_area_matches_face_extent() {
        let footprint = square();
        let face = Face::Vertical {
            a: Point2::new(0.0, 0.0),
            b: Point2::new(10.0, 0.0),
            z_bottom: 0.0,
            z_top: 2.0,
        };
        let poly = face.local_polygon(&footprint);
        assert!((poly.area() - 20.0).abs() < 1e-6);
    }
}
