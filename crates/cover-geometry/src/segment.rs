use crate::point::{COLINEAR_EPS, Point2};
use serde::{Deserialize, Serialize};

/// A 2D line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point2,
    pub b: Point2,
}

impl Segment {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() <= COLINEAR_EPS
    }

    pub fn direction(&self) -> glam::Vec2 {
        self.b - self.a
    }

    pub fn midpoint(&self) -> Point2 {
        self.a.lerp(self.b, 0.5)
    }

    pub fn intersects(&self, other: &Segment, touching_counts: bool) -> bool {
        line_segment_intersects(self.a, self.b, other.a, other.b, touching_counts)
    }
}

fn cross(o: glam::Vec2, a: glam::Vec2, b: glam::Vec2) -> f32 {
    let oa = a - o;
    let ob = b - o;
    oa.x * ob.y - oa.y * ob.x
}

fn orientation(p: Point2, q: Point2, r: Point2) -> f32 {
    cross(p.0, q.0, r.0)
}

fn on_segment(p: Point2, q: Point2, r: Point2) -> bool {
    q.x() <= p.x().max(r.x()) + COLINEAR_EPS
        && q.x() >= p.x().min(r.x()) - COLINEAR_EPS
        && q.y() <= p.y().max(r.y()) + COLINEAR_EPS
        && q.y() >= p.y().min(r.y()) - COLINEAR_EPS
}

/// `lineSegmentIntersects(A,B,C,D)` from spec §4.1: true iff the segments
/// properly cross. `touching_counts` controls whether shared/collinear
/// endpoint contact is reported as an intersection.
pub fn line_segment_intersects(a: Point2, b: Point2, c: Point2, d: Point2, touching_counts: bool) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    let o1s = o1.abs() > COLINEAR_EPS;
    let o2s = o2.abs() > COLINEAR_EPS;
    let o3s = o3.abs() > COLINEAR_EPS;
    let o4s = o4.abs() > COLINEAR_EPS;

    if o1s && o2s && o3s && o4s && (o1 > 0.0) != (o2 > 0.0) && (o3 > 0.0) != (o4 > 0.0) {
        return true;
    }

    if !touching_counts {
        return false;
    }

    // Colinear / touching special cases.
    if !o1s && on_segment(a, c, b) {
        return true;
    }
    if !o2s && on_segment(a, d, b) {
        return true;
    }
    if !o3s && on_segment(c, a, d) {
        return true;
    }
    if !o4s && on_segment(c, b, d) {
        return true;
    }
    false
}

/// Intersection point of two infinite lines through (a,b) and (c,d), if any
/// (parallel lines return `None`). Used by the clipper and by shadow
/// projection, where the caller already knows the segments are not
/// collinear.
pub fn line_intersection_point(a: Point2, b: Point2, c: Point2, d: Point2) -> Option<Point2> {
    let r = b - a;
    let s = d - c;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let t = ((c.0 - a.0).x * s.y - (c.0 - a.0).y * s.x) / denom;
    Some(a + r * t)
}
