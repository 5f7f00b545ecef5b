use cover_geometry::{covered_area, Point2, Point3, Polygon, Ray3, Rect};
use cover_index::ObstacleIndex;
use cover_model::{Placeable, PlaceableKind, Token};

use crate::config::VisibilityConfig;
use crate::edge_cases::shared_precheck;
use crate::face::{viewer_facing_faces, Face};

/// Stand-in bound for an unbounded wall/region elevation band, so a wall
/// with `elevation.top = None` still yields a finite quad to project.
const UNBOUNDED_Z: f32 = 10_000.0;

fn vertical_quad(a: Point2, b: Point2, z_bottom: f32, z_top: f32) -> [Point3; 4] {
    [
        Point3::new(a.x(), a.y(), z_bottom),
        Point3::new(b.x(), b.y(), z_bottom),
        Point3::new(b.x(), b.y(), z_top),
        Point3::new(a.x(), a.y(), z_top),
    ]
}

/// Every blocker surface as a 3D quad: wall segments and token/tile
/// footprint edges, each extruded across the blocker's elevation band. Each
/// quad approximates one face of the blocker's volume (spec §4.4.c "any
/// planar blocker"); curved or non-planar occluders aren't modeled.
fn blocker_quads(
    viewer: Point3,
    index: &ObstacleIndex,
    bounds: Rect,
    config: &VisibilityConfig,
    target: &Token,
) -> Vec<[Point3; 4]> {
    let mut quads = Vec::new();

    if config.blocking.walls {
        for placeable in index.query_aabb(bounds, &[PlaceableKind::Wall]) {
            if let Placeable::Wall(wall) = placeable {
                if wall.is_degenerate() || !wall.restricts_sense(config.sense_kind) {
                    continue;
                }
                if !wall.blocks_from(viewer.xy()) {
                    continue;
                }
                let z_bottom = wall.elevation.bottom.unwrap_or(-UNBOUNDED_Z);
                let z_top = wall.elevation.top.unwrap_or(UNBOUNDED_Z);
                quads.push(vertical_quad(wall.segment.a, wall.segment.b, z_bottom, z_top));
            }
        }
    }

    if config.blocking.tiles {
        for placeable in index.query_aabb(bounds, &[PlaceableKind::Tile]) {
            if let Placeable::Tile(tile) = placeable {
                if !tile.blocks_at_alpha(1.0) {
                    continue;
                }
                let n = tile.shape.points.len();
                for i in 0..n {
                    let a = tile.shape.points[i];
                    let b = tile.shape.points[(i + 1) % n];
                    quads.push(vertical_quad(a, b, tile.elevation - UNBOUNDED_Z, tile.elevation + UNBOUNDED_Z));
                }
            }
        }
    }

    for placeable in index.query_aabb(bounds, &[PlaceableKind::Token]) {
        if let Placeable::Token(token) = placeable {
            if token.id == target.id || config.excluded_tokens.contains(&token.id) {
                continue;
            }
            let allowed = if !token.disposition.alive {
                config.blocking.tokens.dead
            } else if token.disposition.prone {
                config.blocking.tokens.prone
            } else {
                config.blocking.tokens.live
            };
            if !allowed {
                continue;
            }
            let poly = token.footprint.to_polygon();
            let n = poly.points.len();
            for i in 0..n {
                let a = poly.points[i];
                let b = poly.points[(i + 1) % n];
                quads.push(vertical_quad(a, b, token.z_bottom, token.z_top));
            }
        }
    }

    quads
}

/// Projects a 3D quad's corners onto `face`'s plane along rays from
/// `viewer`, in the face's own local 2D coordinates. A corner whose ray is
/// parallel to the plane, or that would project behind the viewer, drops
/// the whole quad for this face rather than guessing at a partial shape.
fn project_quad_to_face(viewer: Point3, corners: &[Point3; 4], face: &Face) -> Option<Polygon> {
    let mut local = Vec::with_capacity(4);
    for &corner in corners {
        if corner.distance(viewer) <= f32::EPSILON {
            return None;
        }
        let ray = Ray3::through(viewer, corner);
        let hit = face.intersect(&ray)?;
        local.push(face.to_local(hit));
    }
    Some(Polygon::new(local))
}

/// 3D area-overlap variant (spec §4.4.c): every viewer-facing face of the
/// target's box is checked independently, then obscured/total area is
/// summed across faces.
pub fn percent_visible_area3d(
    viewer: Point3,
    target: &Token,
    config: &VisibilityConfig,
    index: &ObstacleIndex,
    scene_bounds: Rect,
) -> f32 {
    let target_polygon = target.footprint.to_polygon();
    let target_center = target.footprint.center();

    if let Some(shortcut) = shared_precheck(viewer.xy(), target_center, &target_polygon, scene_bounds, index.is_empty()) {
        return shortcut.percent;
    }

    let faces = viewer_facing_faces(viewer, &target_polygon, target.z_bottom, target.z_top);
    if faces.is_empty() {
        return 1.0;
    }

    let quads = blocker_quads(viewer, index, scene_bounds, config, target);

    let mut total_area = 0.0_f64;
    let mut blocked_area = 0.0_f64;

    for face in &faces {
        let face_polygon = face.local_polygon(&target_polygon);
        let face_area = face_polygon.area();
        if face_area <= f64::from(f32::EPSILON) {
            continue;
        }
        total_area += face_area;

        let shadows: Vec<Polygon> = quads
            .iter()
            .filter_map(|corners| project_quad_to_face(viewer, corners, face))
            .filter(|poly| poly.points.len() >= 3)
            .filter_map(|poly| poly.intersect_convex(&face_polygon).ok())
            .filter(|poly| poly.points.len() >= 3)
            .collect();

        blocked_area += covered_area(&shadows, &face_polygon);
    }

    if total_area <= f64::from(f32::EPSILON) {
        return 1.0;
    }
    ((total_area - blocked_area) / total_area).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::Segment;
    use cover_model::{ElevationBand, Footprint, SenseKind, TokenId, Wall, WallClass, WallId};

    fn target_token() -> Token {
        Token::new(
            TokenId::new(2),
            Footprint::Rect(Rect::from_min_max(Point2::new(8.0, 4.0), Point2::new(9.0, 6.0))),
            0.0,
            2.0,
        )
    }

    fn scene() -> Rect {
        Rect::from_min_max(Point2::new(-10.0, -10.0), Point2::new(20.0, 20.0))
    }

    #[test]
    fn unobstructed_target_is_fully_visible() {
        let index = ObstacleIndex::new(scene());
        let percent = percent_visible_area3d(
            Point3::new(1.0, 5.0, 1.0),
            &target_token(),
            &VisibilityConfig::default(),
            &index,
            scene(),
        );
        assert!((percent - 1.0).abs() < 1e-4);
    }

    #[test]
    fn full_height_wall_blocks_near_face_substantially() {
        let mut index = ObstacleIndex::new(scene());
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(4.0, 2.0), Point2::new(4.0, 8.0)),
            class: WallClass::Opaque,
            elevation: ElevationBand {
                bottom: Some(-5.0),
                top: Some(5.0),
            },
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let percent = percent_visible_area3d(
            Point3::new(1.0, 5.0, 1.0),
            &target_token(),
            &VisibilityConfig::default(),
            &index,
            scene(),
        );
        assert!(percent < 0.3, "percent = {percent}");
    }
}
