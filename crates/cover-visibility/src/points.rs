use cover_geometry::{line_segment_intersects, Point2, Point3, Polygon, Rect};
use cover_index::ObstacleIndex;
use cover_model::{Disposition, Placeable, PlaceableKind, Token, TokenId};

use crate::config::VisibilityConfig;
use crate::edge_cases::shared_precheck;

fn corner_points(rect: Rect, inset: f32) -> [Point2; 4] {
    let inset_x = rect.width() * inset;
    let inset_y = rect.height() * inset;
    [
        Point2::new(rect.min.x() + inset_x, rect.min.y() + inset_y),
        Point2::new(rect.max.x() - inset_x, rect.min.y() + inset_y),
        Point2::new(rect.max.x() - inset_x, rect.max.y() - inset_y),
        Point2::new(rect.min.x() + inset_x, rect.max.y() - inset_y),
    ]
}

fn edge_midpoints(corners: [Point2; 4]) -> [Point2; 4] {
    [
        corners[0].lerp(corners[1], 0.5),
        corners[1].lerp(corners[2], 0.5),
        corners[2].lerp(corners[3], 0.5),
        corners[3].lerp(corners[0], 0.5),
    ]
}

/// `{1, 5, 9}` 2D sample points on `rect`, per spec §4.4.a (center; center
/// plus corners; center plus corners plus edge midpoints).
fn sample_points_2d(rect: Rect, count: u8, inset: f32) -> Vec<Point2> {
    let center = rect.center();
    match count {
        1 => vec![center],
        5 => {
            let mut points = vec![center];
            points.extend(corner_points(rect, inset));
            points
        }
        _ => {
            let corners = corner_points(rect, inset);
            let mut points = vec![center];
            points.extend(corners);
            points.extend(edge_midpoints(corners));
            points
        }
    }
}

/// Sample viewpoints on the viewer's own footprint (spec §4.4 "Viewer
/// points"): the same `{1,5,9}` center/corner/edge pattern used for target
/// sampling (spec §4.4.a), held at the viewer's own eye height `z` since the
/// spec does not vary viewer elevation across samples.
pub fn sample_viewer_points(footprint_rect: Rect, count: u8, inset: f32, z: f32) -> Vec<Point3> {
    sample_points_2d(footprint_rect, count, inset)
        .into_iter()
        .map(|p| Point3::new(p.x(), p.y(), z))
        .collect()
}

/// Lifts 2D samples onto one or two z layers depending on `points_3d` (spec
/// §4.4.a `points3d`).
fn sample_points_3d(rect: Rect, count: u8, inset: f32, z_bottom: f32, z_top: f32, points_3d: bool) -> Vec<Point3> {
    let flat = sample_points_2d(rect, count, inset);
    if points_3d {
        let mut out = Vec::with_capacity(flat.len() * 2);
        for p in &flat {
            out.push(Point3::new(p.x(), p.y(), z_bottom));
            out.push(Point3::new(p.x(), p.y(), z_top));
        }
        out
    } else {
        let mid_z = (z_bottom + z_top) * 0.5;
        flat.into_iter().map(|p| Point3::new(p.x(), p.y(), mid_z)).collect()
    }
}

fn segment_intersects_polygon(a: Point2, b: Point2, poly: &Polygon) -> bool {
    let n = poly.points.len();
    for i in 0..n {
        let edge_a = poly.points[i];
        let edge_b = poly.points[(i + 1) % n];
        if line_segment_intersects(a, b, edge_a, edge_b, true) {
            return true;
        }
    }
    poly.contains_point(a) || poly.contains_point(b)
}

fn disposition_blocks(disposition: Disposition, allowed: crate::config::TokenBlocking) -> bool {
    if !disposition.alive {
        return allowed.dead;
    }
    if disposition.prone {
        return allowed.prone;
    }
    allowed.live
}

fn viewer_sample_unblocked(
    viewer: Point3,
    sample: Point3,
    target_id: TokenId,
    viewer_id: Option<TokenId>,
    config: &VisibilityConfig,
    index: &ObstacleIndex,
) -> bool {
    let a2 = viewer.xy();
    let b2 = sample.xy();

    if config.blocking.walls {
        for placeable in index.query_ray(a2, b2, &[PlaceableKind::Wall]) {
            if let Placeable::Wall(wall) = placeable {
                if wall.is_degenerate() || !wall.restricts_sense(config.sense_kind) {
                    continue;
                }
                if !wall.elevation.overlaps(viewer.0.z.min(sample.0.z), viewer.0.z.max(sample.0.z)) {
                    continue;
                }
                if !wall.blocks_from(a2) {
                    continue;
                }
                if line_segment_intersects(a2, b2, wall.segment.a, wall.segment.b, true) {
                    return false;
                }
            }
        }
    }

    if config.blocking.tiles {
        for placeable in index.query_ray(a2, b2, &[PlaceableKind::Tile]) {
            if let Placeable::Tile(tile) = placeable {
                let z_lo = viewer.0.z.min(sample.0.z);
                let z_hi = viewer.0.z.max(sample.0.z);
                if tile.elevation < z_lo || tile.elevation > z_hi {
                    continue;
                }
                if tile.blocks_at_alpha(1.0) && segment_intersects_polygon(a2, b2, &tile.shape) {
                    return false;
                }
            }
        }
    }

    for placeable in index.query_ray(a2, b2, &[PlaceableKind::Token]) {
        if let Placeable::Token(token) = placeable {
            if token.id == target_id || Some(token.id) == viewer_id {
                continue;
            }
            if config.excluded_tokens.contains(&token.id) {
                continue;
            }
            if !disposition_blocks(token.disposition, config.blocking.tokens) {
                continue;
            }
            let z_lo = viewer.0.z.min(sample.0.z);
            let z_hi = viewer.0.z.max(sample.0.z);
            if token.z_top < z_lo || token.z_bottom > z_hi {
                continue;
            }
            if segment_intersects_polygon(a2, b2, &token.footprint.to_polygon()) {
                return false;
            }
        }
    }

    true
}

/// Point-sampling variant (spec §4.4.a): fraction of target silhouette
/// samples with an unobstructed segment back to the viewpoint.
pub fn percent_visible_points(
    viewer: Point3,
    viewer_id: Option<TokenId>,
    target: &Token,
    config: &VisibilityConfig,
    index: &ObstacleIndex,
    scene_bounds: Rect,
) -> f32 {
    let target_polygon = target.footprint.to_polygon();
    let target_center = target.footprint.center();

    if let Some(shortcut) = shared_precheck(
        viewer.xy(),
        target_center,
        &target_polygon,
        scene_bounds,
        index.is_empty(),
    ) {
        return shortcut.percent;
    }

    let rect = target.footprint.bounding_rect();
    let samples = sample_points_3d(
        rect,
        config.target_point_count,
        config.target_inset,
        target.z_bottom,
        target.z_top,
        config.points_3d,
    );
    if samples.is_empty() {
        return 1.0;
    }

    let unblocked = samples
        .iter()
        .filter(|&&sample| viewer_sample_unblocked(viewer, sample, target.id, viewer_id, config, index))
        .count();
    unblocked as f32 / samples.len() as f32
}
