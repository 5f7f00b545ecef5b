use cover_geometry::{covered_area, Point2, Polygon, Rect};
use cover_index::ObstacleIndex;
use cover_model::{Placeable, PlaceableKind, Token};

use crate::config::VisibilityConfig;
use crate::edge_cases::shared_precheck;

/// How far a blocker's shadow is extended past the target, in world units.
/// Large enough to clear any plausible scene footprint without the sweep
/// degenerating (an unbounded projection would make every shadow cover the
/// whole plane, which the sweep can't represent as a finite polygon).
const SHADOW_REACH: f32 = 10_000.0;

/// Projects a segment's shadow away from `viewer`, far enough past `target`
/// to act as an effectively unbounded half-plane within the clip region.
fn shadow_quad(viewer: Point2, a: Point2, b: Point2) -> Polygon {
    let far_a = a + (a - viewer) * (SHADOW_REACH / (a - viewer).length().max(f32::EPSILON));
    let far_b = b + (b - viewer) * (SHADOW_REACH / (b - viewer).length().max(f32::EPSILON));
    Polygon::new(vec![a, b, far_b, far_a])
}

fn wall_shadows(viewer: Point2, index: &ObstacleIndex, bounds: Rect, config: &VisibilityConfig) -> Vec<Polygon> {
    if !config.blocking.walls {
        return Vec::new();
    }
    index
        .query_aabb(bounds, &[PlaceableKind::Wall])
        .into_iter()
        .filter_map(|placeable| match placeable {
            Placeable::Wall(wall) => {
                if wall.is_degenerate() || !wall.restricts_sense(config.sense_kind) {
                    return None;
                }
                if !wall.blocks_from(viewer) {
                    return None;
                }
                Some(shadow_quad(viewer, wall.segment.a, wall.segment.b))
            }
            _ => None,
        })
        .collect()
}

fn tile_shadows(viewer: Point2, index: &ObstacleIndex, bounds: Rect, config: &VisibilityConfig) -> Vec<Polygon> {
    if !config.blocking.tiles {
        return Vec::new();
    }
    index
        .query_aabb(bounds, &[PlaceableKind::Tile])
        .into_iter()
        .filter_map(|placeable| match placeable {
            Placeable::Tile(tile) if tile.blocks_at_alpha(1.0) => {
                let n = tile.shape.points.len();
                let mut shadows = Vec::with_capacity(n);
                for i in 0..n {
                    let a = tile.shape.points[i];
                    let b = tile.shape.points[(i + 1) % n];
                    shadows.push(shadow_quad(viewer, a, b));
                }
                Some(shadows)
            }
            _ => None,
        })
        .flatten()
        .collect()
}

fn token_shadows(
    viewer: Point2,
    index: &ObstacleIndex,
    bounds: Rect,
    config: &VisibilityConfig,
    target: &Token,
) -> Vec<Polygon> {
    index
        .query_aabb(bounds, &[PlaceableKind::Token])
        .into_iter()
        .filter_map(|placeable| match placeable {
            Placeable::Token(token) if token.id != target.id && !config.excluded_tokens.contains(&token.id) => {
                let allowed = if !token.disposition.alive {
                    config.blocking.tokens.dead
                } else if token.disposition.prone {
                    config.blocking.tokens.prone
                } else {
                    config.blocking.tokens.live
                };
                if !allowed {
                    return None;
                }
                let n_ = token.footprint.to_polygon().points.len();
                let poly = token.footprint.to_polygon();
                let mut shadows = Vec::with_capacity(n_);
                for i in 0..n_ {
                    let a = poly.points[i];
                    let b = poly.points[(i + 1) % n_];
                    shadows.push(shadow_quad(viewer, a, b));
                }
                Some(shadows)
            }
            _ => None,
        })
        .flatten()
        .collect()
}

/// 2D area-overlap variant (spec §4.4.b): fraction of the target's
/// footprint area not covered by the union of blocker shadows projected
/// from `viewer`.
pub fn percent_visible_area2d(
    viewer: Point2,
    target: &Token,
    config: &VisibilityConfig,
    index: &ObstacleIndex,
    scene_bounds: Rect,
) -> f32 {
    let target_polygon = target.footprint.to_polygon();
    let target_center = target.footprint.center();

    if let Some(shortcut) = shared_precheck(viewer, target_center, &target_polygon, scene_bounds, index.is_empty()) {
        return shortcut.percent;
    }

    let query_bounds = scene_bounds;
    let mut shadows = wall_shadows(viewer, index, query_bounds, config);
    shadows.extend(tile_shadows(viewer, index, query_bounds, config));
    shadows.extend(token_shadows(viewer, index, query_bounds, config, target));

    let target_area = target_polygon.area();
    if target_area <= f64::from(f32::EPSILON) {
        return 1.0;
    }

    let clipped_shadows: Vec<Polygon> = shadows
        .iter()
        .filter_map(|shadow| shadow.intersect_convex(&target_polygon).ok())
        .filter(|poly| poly.points.len() >= 3)
        .collect();

    let blocked = covered_area(&clipped_shadows, &target_polygon);
    ((target_area - blocked) / target_area).clamp(0.0, 1.0) as f32
}
