use cover_geometry::{Point2, Polygon, Segment};
use glam::Vec2;

/// Angular nudge used to sample just past and before each segment endpoint,
/// so the sweep captures the near and far side of every corner (a
/// corner otherwise falls exactly on a discontinuity in the visible
/// boundary).
const ANGLE_EPS: f32 = 1e-4;

fn cross2(u: Vec2, v: Vec2) -> f32 {
    u.x * v.y - u.y * v.x
}

/// Distance along `dir` (from `origin`) at which the ray hits segment
/// `a`-`b`, if it does. `dir` need not be normalized; the returned `t`
/// is in units of `dir`'s length.
fn ray_segment_t(origin: Point2, dir: Vec2, a: Point2, b: Point2) -> Option<f32> {
    let e = b - a;
    let f = a - origin;
    let denom = cross2(dir, e);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let t = cross2(f, e) / denom;
    let s = cross2(f, dir) / denom;
    if t >= 0.0 && (0.0..=1.0).contains(&s) {
        Some(t)
    } else {
        None
    }
}

fn angle_of(center: Point2, p: Point2) -> f32 {
    let d = p - center;
    d.y.atan2(d.x)
}

/// Builds the 360-degree visibility polygon around `center`, bounded by
/// `segments` (walls plus the scene's four boundary edges). The result is
/// star-shaped about `center` but not necessarily convex; callers clip it
/// against a convex footprint with [`Polygon::intersect_convex`] rather than
/// relying on this being convex itself.
pub fn visibility_polygon(center: Point2, segments: &[Segment]) -> Polygon {
    if segments.is_empty() {
        return Polygon::new(Vec::new());
    }

    let mut angles = Vec::with_capacity(segments.len() * 6);
    for seg in segments {
        for &endpoint in &[seg.a, seg.b] {
            let base = angle_of(center, endpoint);
            angles.push(base - ANGLE_EPS);
            angles.push(base);
            angles.push(base + ANGLE_EPS);
        }
    }
    angles.sort_by(|a, b| a.partial_cmp(b).expect("angle is never NaN"));
    angles.dedup_by(|a, b| (*a - *b).abs() < 1e-7);

    let mut points = Vec::with_capacity(angles.len());
    for angle in angles {
        let dir = Vec2::new(angle.cos(), angle.sin());
        let mut closest = f32::INFINITY;
        for seg in segments {
            if let Some(t) = ray_segment_t(center, dir, seg.a, seg.b) {
                if t < closest {
                    closest = t;
                }
            }
        }
        if closest.is_finite() {
            points.push(center + dir * closest);
        }
    }
    Polygon::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segments_yield_empty_polygon() {
        let poly = visibility_polygon(Point2::ZERO, &[]);
        assert!(poly.points.is_empty());
    }

    #[test]
    fn square_boundary_reproduces_itself() {
        let boundary = [
            Segment::new(Point2::new(-10.0, -10.0), Point2::new(10.0, -10.0)),
            Segment::new(Point2::new(10.0, -10.0), Point2::new(10.0, 10.0)),
            Segment::new(Point2::new(10.0, 10.0), Point2::new(-10.0, 10.0)),
            Segment::new(Point2::new(-10.0, 10.0), Point2::new(-10.0, -10.0)),
        ];
        let poly = visibility_polygon(Point2::ZERO, &boundary);
        assert!(poly.points.len() >= 4);
        let area = poly.area();
        assert!((area - 400.0).abs() < 1.0, "area was {area}");
    }

    #[test]
    fn interior_wall_casts_a_shadow_on_the_boundary() {
        let boundary = [
            Segment::new(Point2::new(-10.0, -10.0), Point2::new(10.0, -10.0)),
            Segment::new(Point2::new(10.0, -10.0), Point2::new(10.0, 10.0)),
            Segment::new(Point2::new(10.0, 10.0), Point2::new(-10.0, 10.0)),
            Segment::new(Point2::new(-10.0, 10.0), Point2::new(-10.0, -10.0)),
        ];
        let wall = Segment::new(Point2::new(5.0, -2.0), Point2::new(5.0, 2.0));
        let mut segments = boundary.to_vec();
        segments.push(wall);
        let poly = visibility_polygon(Point2::ZERO, &segments);
        let unobstructed = visibility_polygon(Point2::ZERO, &boundary);
        assert!(poly.area() < unobstructed.area());
    }
}
