use cover_geometry::{Point2, Rect};
use cover_index::ObstacleIndex;
use cover_model::{CoreError, PercentVisible, Token};
use cover_visibility::VisibilityConfig;

use crate::rasterize::rasterize_scene;
use crate::renderer::DEFAULT_RENDER_TEXTURE_SIZE;
use crate::strategies::count_cpu_readback;

/// GPU rasterized pixel-count variant (spec §4.4.d), the fourth
/// `percent_visible` calculator. The actual counting math runs through the
/// same pure rasterize-then-count path regardless of whether a real
/// `wgpu` adapter is available: [`crate::renderer::GpuRenderer`] exists to
/// drive that path from an actual GPU frame, but the result this function
/// returns depends only on [`crate::pixels::count_from_pixels`], so it's
/// fully exercised without one.
pub struct GpuPixelCounter {
    render_texture_size: u32,
    alpha_threshold: f32,
}

impl Default for GpuPixelCounter {
    fn default() -> Self {
        Self {
            render_texture_size: DEFAULT_RENDER_TEXTURE_SIZE,
            alpha_threshold: cover_model::DEFAULT_ALPHA_THRESHOLD,
        }
    }
}

impl GpuPixelCounter {
    pub fn new(render_texture_size: u32, alpha_threshold: f32) -> Self {
        Self {
            render_texture_size,
            alpha_threshold,
        }
    }

    /// Renders `target`'s silhouette relative to `viewer` and returns the
    /// fraction of target pixels not blocked. Never fails: a target whose
    /// footprint rasterizes to zero red pixels (vanishingly small on
    /// screen) is reported fully visible, matching the other calculators'
    /// zero-area edge case.
    pub fn percent_visible(&self, viewer: Point2, target: &Token, config: &VisibilityConfig, index: &ObstacleIndex, scene_bounds: Rect) -> Result<PercentVisible, CoreError> {
        let scene = rasterize_scene(viewer, target, config, index, scene_bounds, self.render_texture_size);
        let counts = count_cpu_readback(&scene, self.alpha_threshold);
        Ok(PercentVisible::exact(counts.percent_visible()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::Segment;
    use cover_model::{ElevationBand, Footprint, Placeable, SenseKind, TokenId, Wall, WallClass, WallId};

    fn scene_bounds() -> Rect {
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
    fn unobstructed_target_is_fully_visible() {
        let index = ObstacleIndex::new(scene_bounds());
        let counter = GpuPixelCounter::default();
        let result = counter
            .percent_visible(Point2::new(1.0, 5.0), &target_token(), &VisibilityConfig::default(), &index, scene_bounds())
            .unwrap();
        assert!((result.percent - 1.0).abs() < 0.02);
        assert!(!result.approximate);
    }

    #[test]
    fn wall_spanning_target_width_blocks_almost_fully() {
        let mut index = ObstacleIndex::new(scene_bounds());
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(4.0, 2.0), Point2::new(4.0, 8.0)),
            class: WallClass::Opaque,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let counter = GpuPixelCounter::default();
        let result = counter
            .percent_visible(Point2::new(1.0, 5.0), &target_token(), &VisibilityConfig::default(), &index, scene_bounds())
            .unwrap();
        assert!(result.percent < 0.05, "percent = {}", result.percent);
    }
}
