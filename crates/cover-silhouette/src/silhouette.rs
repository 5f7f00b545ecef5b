use crate::visibility::visibility_polygon;
use cover_geometry::{Point2, Polygon, Rect, Segment};
use cover_index::ObstacleIndex;
use cover_model::{CoreResult, PlaceableKind, SenseKind, Token, Wall};

/// The constrained silhouette of a token: its footprint intersected with the
/// region visible from the token's own center against walls restricting the
/// given sense kind and the scene boundary (spec §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedSilhouette {
    pub polygon: Polygon,
    /// Set when no relevant walls were found; `contains` callers can
    /// short-circuit straight to the unmodified footprint test.
    pub unrestricted: bool,
}

impl ConstrainedSilhouette {
    pub fn contains(&self, p: Point2) -> bool {
        self.polygon.contains_point(p)
    }
}

fn scene_boundary_edges(scene_bounds: Rect) -> [Segment; 4] {
    let c = scene_bounds.corners();
    [
        Segment::new(c[0], c[1]),
        Segment::new(c[1], c[2]),
        Segment::new(c[2], c[3]),
        Segment::new(c[3], c[0]),
    ]
}

/// True if `wall` lies exactly on one of `footprint`'s edges — the spec's
/// tie-break rule that such a wall does not trim the silhouette.
fn lies_on_footprint_edge(wall: &Wall, footprint: &Polygon) -> bool {
    let n = footprint.points.len();
    for i in 0..n {
        let a = footprint.points[i];
        let b = footprint.points[(i + 1) % n];
        if point_on_segment(wall.segment.a, a, b) && point_on_segment(wall.segment.b, a, b) {
            return true;
        }
    }
    false
}

fn point_on_segment(p: Point2, a: Point2, b: Point2) -> bool {
    use cover_geometry::COLINEAR_EPS;
    let ab = b - a;
    let ap = p - a;
    let cross = ab.x * ap.y - ab.y * ap.x;
    let len = ab.length().max(f32::EPSILON);
    if (cross / len).abs() > COLINEAR_EPS {
        return false;
    }
    let t = ab.dot(ap) / ab.length_squared().max(f32::EPSILON);
    (-1e-3..=1.0 + 1e-3).contains(&t)
}

/// Builds the constrained silhouette for `token` against `sense`, seeding
/// the sweep with walls whose AABB intersects the token's bounding
/// rectangle plus the four scene boundary edges (spec §4.3).
pub fn build_silhouette(
    token: &Token,
    sense: SenseKind,
    index: &ObstacleIndex,
    scene_bounds: Rect,
) -> CoreResult<ConstrainedSilhouette> {
    let footprint = token.footprint.to_polygon();
    let center = token.footprint.center();
    let bbox = token.footprint.bounding_rect();

    let candidates = index.query_aabb(bbox, &[PlaceableKind::Wall]);
    let relevant_walls: Vec<&Wall> = candidates
        .into_iter()
        .filter_map(|placeable| match placeable {
            cover_model::Placeable::Wall(wall) => Some(wall),
            _ => None,
        })
        .filter(|wall| !wall.is_degenerate())
        .filter(|wall| wall.restricts_sense(sense))
        .filter(|wall| wall.blocks_from(center))
        .filter(|wall| !lies_on_footprint_edge(wall, &footprint))
        .collect();

    if relevant_walls.is_empty() {
        return Ok(ConstrainedSilhouette {
            polygon: footprint,
            unrestricted: true,
        });
    }

    let mut segments: Vec<Segment> = relevant_walls.iter().map(|w| w.segment).collect();
    segments.extend(scene_boundary_edges(scene_bounds));

    let visible = visibility_polygon(center, &segments);
    let clipped = visible.intersect_convex(&footprint)?;
    Ok(ConstrainedSilhouette {
        polygon: clipped,
        unrestricted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::{Point2, Rect};
    use cover_model::{ElevationBand, Footprint, Placeable, SenseKind, Token, TokenId, WallClass, WallId};

    fn token_at(center: Point2) -> Token {
        Token::new(
            TokenId::new(1),
            Footprint::Rect(Rect::from_center_half_extent(center, glam::vec2(0.5, 0.5))),
            0.0,
            1.0,
        )
    }

    #[test]
    fn unrestricted_when_no_relevant_walls() {
        let index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)));
        let token = token_at(Point2::new(5.0, 5.0));
        let scene = Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let result = build_silhouette(&token, SenseKind::Sight, &index, scene).unwrap();
        assert!(result.unrestricted);
        assert_eq!(result.polygon, token.footprint.to_polygon());
    }

    #[test]
    fn wall_on_footprint_edge_does_not_trim() {
        let mut index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)));
        let token = token_at(Point2::new(5.0, 5.0));
        // Wall lying exactly on the token's left edge.
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(4.5, 4.5), Point2::new(4.5, 5.5)),
            class: WallClass::Opaque,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let scene = Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let result = build_silhouette(&token, SenseKind::Sight, &index, scene).unwrap();
        assert!(result.unrestricted);
    }

    #[test]
    fn interior_wall_trims_the_silhouette() {
        let mut index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)));
        let token = token_at(Point2::new(5.0, 5.0));
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(5.3, 4.0), Point2::new(5.3, 6.0)),
            class: WallClass::Opaque,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let scene = Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let result = build_silhouette(&token, SenseKind::Sight, &index, scene).unwrap();
        assert!(!result.unrestricted);
        assert!(result.polygon.area() < token.footprint.to_polygon().area());
    }
}
