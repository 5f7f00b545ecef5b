use crate::error::{GeomResult, GeometryError};
use crate::fixed_point::snap_f32;
use crate::point::Point2;
use crate::rect::Rect;
use serde::{Deserialize, Serialize};

/// A simple (non-self-intersecting) polygon, vertices in order (either
/// winding). Used both for token footprints/silhouettes (generally convex)
/// and for wall/tile perspective shadows (always convex: the perspective
/// projection of a straight edge from a single viewpoint is a triangle or
/// quad).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point2>,
}

impl Polygon {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn validate(&self) -> GeomResult<()> {
        if self.points.len() < 3 {
            return Err(GeometryError::Degenerate("polygon has fewer than 3 vertices"));
        }
        if self.area() <= f64::from(f32::EPSILON) {
            return Err(GeometryError::Degenerate("polygon has zero area"));
        }
        Ok(())
    }

    /// Shoelace formula; always non-negative.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0_f64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            sum += f64::from(p.x()) * f64::from(q.y()) - f64::from(q.x()) * f64::from(p.y());
        }
        sum / 2.0
    }

    /// Vertices listed clockwise in screen/world-Y-down coordinates iff the
    /// signed area is negative for a Y-up convention; callers that need a
    /// specific winding should check this rather than assume one.
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn bounding_rect(&self) -> Rect {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min = Point2::new(min.x().min(p.x()), min.y().min(p.y()));
            max = Point2::new(max.x().max(p.x()), max.y().max(p.y()));
        }
        Rect::from_min_max(min, max)
    }

    pub fn translated(&self, delta: glam::Vec2) -> Self {
        Self {
            points: self.points.iter().map(|p| Point2(p.0 + delta)).collect(),
        }
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        // Standard even-odd ray casting test.
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y() > p.y()) != (pj.y() > p.y()) {
                let x_at_y = (pj.x() - pi.x()) * (p.y() - pi.y()) / (pj.y() - pi.y()) + pi.x();
                if p.x() < x_at_y {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Sutherland-Hodgman clip of `self` (subject, any simple polygon)
    /// against `clip` (must be convex). This is the primitive behind
    /// `intersect` for silhouette clipping, where the footprint is always
    /// convex (rect or regular polygon) but the visibility wedge produced by
    /// the sweep may not be.
    pub fn intersect_convex(&self, clip: &Polygon) -> GeomResult<Polygon> {
        self.validate()?;
        clip.validate()?;

        let clip_cw = clip.is_clockwise();
        let mut output = self.points.clone();

        let n = clip.points.len();
        for i in 0..n {
            if output.is_empty() {
                break;
            }
            let edge_a = clip.points[i];
            let edge_b = clip.points[(i + 1) % n];
            output = clip_edge(&output, edge_a, edge_b, clip_cw);
        }

        let snapped: Vec<Point2> = output
            .into_iter()
            .map(|p| Point2::new(snap_f32(p.x()), snap_f32(p.y())))
            .collect();
        Ok(Polygon::new(dedup_adjacent(snapped)))
    }
}

fn dedup_adjacent(points: Vec<Point2>) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last: &Point2| !last.almost_eq(p)) {
            out.push(p);
        }
    }
    if out.len() > 1 && out.first().is_some_and(|first| first.almost_eq(*out.last().unwrap())) {
        out.pop();
    }
    out
}

/// `inside` test for a convex clip edge: true if `p` is on the interior side
/// of the directed edge `a -> b`, given the clip polygon's own winding.
fn is_inside(p: Point2, a: Point2, b: Point2, clip_cw: bool) -> bool {
    let cross = (b - a).perp_dot(p.0 - a.0);
    if clip_cw { cross <= 0.0 } else { cross >= 0.0 }
}

fn clip_edge(subject: &[Point2], edge_a: Point2, edge_b: Point2, clip_cw: bool) -> Vec<Point2> {
    let mut output = Vec::with_capacity(subject.len() + 1);
    let n = subject.len();
    for i in 0..n {
        let current = subject[i];
        let prev = subject[(i + n - 1) % n];
        let current_in = is_inside(current, edge_a, edge_b, clip_cw);
        let prev_in = is_inside(prev, edge_a, edge_b, clip_cw);

        if current_in {
            if !prev_in {
                if let Some(p) = crate::segment::line_intersection_point(prev, current, edge_a, edge_b) {
                    output.push(p);
                }
            }
            output.push(current);
        } else if prev_in {
            if let Some(p) = crate::segment::line_intersection_point(prev, current, edge_a, edge_b) {
                output.push(p);
            }
        }
    }
    output
}

/// Interval of a vertical line `x = x0` through a convex polygon, assuming
/// the polygon is convex so the intersection is at most one interval.
fn convex_interval_at_x(poly: &[Point2], x: f64) -> Option<(f64, f64)> {
    let n = poly.len();
    let mut ys = Vec::new();
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let (ax, ay) = (f64::from(a.x()), f64::from(a.y()));
        let (bx, by) = (f64::from(b.x()), f64::from(b.y()));
        if (ax <= x && bx >= x) || (bx <= x && ax >= x) {
            if (ax - bx).abs() <= 1e-12 {
                // Vertical edge exactly at x: both endpoints are candidates.
                ys.push(ay);
                ys.push(by);
            } else {
                let t = (x - ax) / (bx - ax);
                if (0.0..=1.0).contains(&t) {
                    ys.push(ay + t * (by - ay));
                }
            }
        }
    }
    if ys.len() < 2 {
        return None;
    }
    let lo = ys.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo <= 1e-9 { None } else { Some((lo, hi)) }
}

fn merge_intervals(mut intervals: Vec<(f64, f64)>) -> f64 {
    if intervals.is_empty() {
        return 0.0;
    }
    intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    let mut total = 0.0;
    let (mut cur_lo, mut cur_hi) = intervals[0];
    for &(lo, hi) in &intervals[1..] {
        if lo > cur_hi {
            total += cur_hi - cur_lo;
            cur_lo = lo;
            cur_hi = hi;
        } else {
            cur_hi = cur_hi.max(hi);
        }
    }
    total += cur_hi - cur_lo;
    total
}

/// Area of `within` (assumed convex) covered by the union of `regions`
/// (each assumed convex, per the shadow-projection guarantee above), via an
/// exact trapezoidal sweep: critical x's are every vertex of every region,
/// every vertex of `within`, and every pairwise edge intersection between
/// regions, so that between consecutive critical x's every interval
/// boundary is linear and the merged covered length is a single trapezoid.
///
/// This is the `union`+`intersect`+`difference` triad from spec §4.1,
/// specialised to the one thing the visibility calculators actually need:
/// the numeric area of `within ∖ union(shadows)`,
/// i.e. `within.area() - covered_area(shadows, within)`.
pub fn covered_area(regions: &[Polygon], within: &Polygon) -> f64 {
    if regions.is_empty() {
        return 0.0;
    }
    let bounds = within.bounding_rect();
    let mut xs: Vec<f64> = vec![f64::from(bounds.min.x()), f64::from(bounds.max.x())];

    for region in regions {
        for p in &region.points {
            let x = f64::from(p.x());
            if x >= f64::from(bounds.min.x()) && x <= f64::from(bounds.max.x()) {
                xs.push(x);
            }
        }
    }
    for p in &within.points {
        xs.push(f64::from(p.x()));
    }

    // Pairwise edge intersections between distinct regions refine the sweep
    // so the merged-interval length stays linear inside every strip.
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            for_each_edge_pair_intersection_x(&regions[i].points, &regions[j].points, &mut xs);
        }
    }

    xs.retain(|x| x.is_finite());
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    xs.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let mut total = 0.0_f64;
    for pair in xs.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);
        if x1 - x0 <= 1e-9 {
            continue;
        }
        let xm0 = x0 + (x1 - x0) * 0.001;
        let xm1 = x1 - (x1 - x0) * 0.001;

        let len0 = strip_covered_length(regions, within, xm0);
        let len1 = strip_covered_length(regions, within, xm1);
        total += (len0 + len1) / 2.0 * (x1 - x0);
    }
    total.max(0.0)
}

fn strip_covered_length(regions: &[Polygon], within: &Polygon, x: f64) -> f64 {
    let Some(within_iv) = convex_interval_at_x(&within.points, x) else {
        return 0.0;
    };
    let mut intervals = Vec::new();
    for region in regions {
        if let Some((lo, hi)) = convex_interval_at_x(&region.points, x) {
            let lo = lo.max(within_iv.0);
            let hi = hi.min(within_iv.1);
            if hi > lo {
                intervals.push((lo, hi));
            }
        }
    }
    merge_intervals(intervals)
}

fn for_each_edge_pair_intersection_x(a: &[Point2], b: &[Point2], xs: &mut Vec<f64>) {
    let na = a.len();
    let nb = b.len();
    for i in 0..na {
        let (a0, a1) = (a[i], a[(i + 1) % na]);
        for j in 0..nb {
            let (b0, b1) = (b[j], b[(j + 1) % nb]);
            if let Some(p) = crate::segment::line_intersection_point(a0, a1, b0, b1) {
                let on_a = point_between(a0, a1, p);
                let on_b = point_between(b0, b1, p);
                if on_a && on_b {
                    xs.push(f64::from(p.x()));
                }
            }
        }
    }
}

fn point_between(a: Point2, b: Point2, p: Point2) -> bool {
    let min_x = a.x().min(b.x()) - 1e-4;
    let max_x = a.x().max(b.x()) + 1e-4;
    let min_y = a.y().min(b.y()) - 1e-4;
    let max_y = a.y().max(b.y()) + 1e-4;
    p.x() >= min_x && p.x() <= max_x && p.y() >= min_y && p.y() <= max_y
}
