use cover_geometry::{Point2, Polygon, Rect};
use cover_index::ObstacleIndex;
use cover_model::{Placeable, PlaceableKind, Token, WallClass};
use cover_visibility::VisibilityConfig;

/// How far a blocker's shadow is extended past the target, matching the
/// area-overlap calculator's choice of an effectively-unbounded half-plane.
const SHADOW_REACH: f32 = 10_000.0;

/// Per-terrain-wall contribution to the green channel: low enough that one
/// terrain wall alone rarely exceeds the default alpha threshold, high
/// enough that two overlapping ones do (glossary: "two overlapping terrain
/// walls together act as a full wall").
const TERRAIN_WALL_CONTRIBUTION: u16 = 140;

fn shadow_quad(viewer: Point2, a: Point2, b: Point2) -> Polygon {
    let far_a = a + (a - viewer) * (SHADOW_REACH / (a - viewer).length().max(f32::EPSILON));
    let far_b = b + (b - viewer) * (SHADOW_REACH / (b - viewer).length().max(f32::EPSILON));
    Polygon::new(vec![a, b, far_b, far_a])
}

fn edge_shadows(viewer: Point2, polygon: &Polygon) -> Vec<Polygon> {
    let n = polygon.points.len();
    let mut shadows = Vec::with_capacity(n);
    for i in 0..n {
        let a = polygon.points[i];
        let b = polygon.points[(i + 1) % n];
        shadows.push(shadow_quad(viewer, a, b));
    }
    shadows
}

/// Obstacle shadows (fully opaque: opaque walls, tiles, tokens) and terrain
/// shadows (partial: `Limited`-class walls) kept separate so the rasterizer
/// can write them to distinct channels.
struct SceneShadows {
    obstacle: Vec<Polygon>,
    terrain: Vec<Polygon>,
}

fn gather_shadows(viewer: Point2, index: &ObstacleIndex, bounds: Rect, config: &VisibilityConfig, target_id: cover_model::TokenId) -> SceneShadows {
    let mut obstacle = Vec::new();
    let mut terrain = Vec::new();

    for placeable in index.query_aabb(bounds, &[PlaceableKind::Wall, PlaceableKind::Tile, PlaceableKind::Token]) {
        match placeable {
            Placeable::Wall(wall) if config.blocking.walls => {
                if wall.is_degenerate() || !wall.restricts_sense(config.sense_kind) || !wall.blocks_from(viewer) {
                    continue;
                }
                let shadow = shadow_quad(viewer, wall.segment.a, wall.segment.b);
                match wall.class {
                    WallClass::Opaque | WallClass::Directional => obstacle.push(shadow),
                    WallClass::Limited => terrain.push(shadow),
                    WallClass::Open => {}
                }
            }
            Placeable::Tile(tile) if config.blocking.tiles && tile.blocks_at_alpha(1.0) => {
                obstacle.extend(edge_shadows(viewer, &Polygon::new(tile.shape.points.clone())));
            }
            Placeable::Token(token) if token.id != target_id && !config.excluded_tokens.contains(&token.id) => {
                let allowed = if !token.disposition.alive {
                    config.blocking.tokens.dead
                } else if token.disposition.prone {
                    config.blocking.tokens.prone
                } else {
                    config.blocking.tokens.live
                };
                if allowed {
                    obstacle.extend(edge_shadows(viewer, &token.footprint.to_polygon()));
                }
            }
            _ => {}
        }
    }

    SceneShadows { obstacle, terrain }
}

/// A CPU-rasterized RGBA8 buffer and the viewport it was rendered into, per
/// the channel contract consumed by [`crate::pixels::count_from_pixels`]:
/// `R`/alpha mark the target's own silhouette, `B` marks obstacle shadow,
/// `G` accumulates terrain shadow contribution.
///
/// This stands in for the GPU fragment shader a renderer would normally run:
/// the same per-pixel classification, done on the CPU, so the counting math
/// is exercised without ever needing a `wgpu` adapter.
pub struct RasterizedScene {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub viewport: Rect,
}

/// Renders `target`'s silhouette and the shadows it casts relative to
/// `viewer` into a `texture_size`-square RGBA8 buffer, viewport-fit to the
/// target's bounding rect.
pub fn rasterize_scene(
    viewer: Point2,
    target: &Token,
    config: &VisibilityConfig,
    index: &ObstacleIndex,
    scene_bounds: Rect,
    texture_size: u32,
) -> RasterizedScene {
    let target_polygon = target.footprint.to_polygon();
    let target_bounds = target_polygon.bounding_rect();
    let margin = target_bounds.width().max(target_bounds.height()).max(1e-3) * 0.1;
    let viewport = Rect::from_min_max(
        Point2::new(target_bounds.min.x() - margin, target_bounds.min.y() - margin),
        Point2::new(target_bounds.max.x() + margin, target_bounds.max.y() + margin),
    );
    let shadows = gather_shadows(viewer, index, scene_bounds, config, target.id);

    let width = texture_size.max(1);
    let height = texture_size.max(1);
    let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];

    let step_x = viewport.width() / width as f32;
    let step_y = viewport.height() / height as f32;

    for row in 0..height {
        let world_y = viewport.min.y() + (row as f32 + 0.5) * step_y;
        for col in 0..width {
            let world_x = viewport.min.x() + (col as f32 + 0.5) * step_x;
            let world_point = Point2::new(world_x, world_y);
            let offset = ((row as usize) * (width as usize) + col as usize) * 4;

            if !target_polygon.contains_point(world_point) {
                continue;
            }

            let blocked_by_obstacle = shadows.obstacle.iter().any(|s| s.contains_point(world_point));
            let terrain_sum: u16 = shadows
                .terrain
                .iter()
                .filter(|s| s.contains_point(world_point))
                .map(|_| TERRAIN_WALL_CONTRIBUTION)
                .sum();

            pixels[offset] = 255; // R: target silhouette
            pixels[offset + 1] = terrain_sum.min(255) as u8; // G: terrain
            pixels[offset + 2] = if blocked_by_obstacle { 255 } else { 0 }; // B: obstacle
            pixels[offset + 3] = 255; // alpha: target stencil
        }
    }

    RasterizedScene { pixels, width, height, viewport }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::Segment;
    use cover_model::{ElevationBand, Footprint, SenseKind, TokenId, Wall, WallClass, WallId};

    fn scene() -> Rect {
        Rect::from_min_max(Point2::new(-10.0, -10.0), Point2::new(20.0, 20.0))
    }

    fn target_token() -> Token {
        Token::new(
            TokenId::new(2),
            Footprint::Rect(Rect::from_min_max(Point2::new(8.0, 4.0), Point2::new(9.0, 6.0))),
            0.0,
            1.0,
        )
    }

    #[test]
    fn unobstructed_target_rasterizes_as_red_with_no_blue() {
        let index = ObstacleIndex::new(scene());
        let scene_rendered = rasterize_scene(Point2::new(1.0, 5.0), &target_token(), &VisibilityConfig::default(), &index, scene(), 32);
        let any_red = scene_rendered.pixels.chunks_exact(4).any(|p| p[0] > 0);
        let any_blue = scene_rendered.pixels.chunks_exact(4).any(|p| p[2] > 0);
        assert!(any_red);
        assert!(!any_blue);
    }

    #[test]
    fn opaque_wall_spanning_target_marks_obstacle_channel() {
        let mut index = ObstacleIndex::new(scene());
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(4.0, 2.0), Point2::new(4.0, 8.0)),
            class: WallClass::Opaque,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let scene_rendered = rasterize_scene(Point2::new(1.0, 5.0), &target_token(), &VisibilityConfig::default(), &index, scene(), 32);
        let any_blue = scene_rendered.pixels.chunks_exact(4).any(|p| p[2] > 0);
        assert!(any_blue);
    }

    #[test]
    fn single_terrain_wall_contributes_partial_green() {
        let mut index = ObstacleIndex::new(scene());
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(4.0, 2.0), Point2::new(4.0, 8.0)),
            class: WallClass::Limited,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let scene_rendered = rasterize_scene(Point2::new(1.0, 5.0), &target_token(), &VisibilityConfig::default(), &index, scene(), 32);
        let green_values: Vec<u8> = scene_rendered.pixels.chunks_exact(4).filter(|p| p[0] > 0).map(|p| p[1]).collect();
        assert!(green_values.iter().any(|&g| g == TERRAIN_WALL_CONTRIBUTION.min(255) as u8));
        assert!(green_values.iter().all(|&g| (g as f32 / 255.0) < cover_model::DEFAULT_ALPHA_THRESHOLD));
    }
}
