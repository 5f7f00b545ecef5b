use cover_geometry::{Point3, Rect};
use cover_index::ObstacleIndex;
use cover_model::{PercentVisible, Token, TokenId};

use crate::area2d::percent_visible_area2d;
use crate::area3d::percent_visible_area3d;
use crate::config::VisibilityConfig;
use crate::points::percent_visible_points;

/// The non-GPU calculator variants this crate provides, in fallback-chain
/// order (a GPU-based fourth variant lives in a sibling crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    Points,
    Area2d,
    Area3d,
}

/// Runs `kind` against a single viewer point, producing an exact (not
/// `approximate`) result: callers in the fallback chain decide when to flag
/// `approximate` themselves, since that depends on *why* a variant was
/// skipped, not on anything this function can see.
pub fn percent_visible(
    kind: Calculator,
    viewer: Point3,
    viewer_id: Option<TokenId>,
    target: &Token,
    config: &VisibilityConfig,
    index: &ObstacleIndex,
    scene_bounds: Rect,
) -> PercentVisible {
    let percent = match kind {
        Calculator::Points => percent_visible_points(viewer, viewer_id, target, config, index, scene_bounds),
        Calculator::Area2d => percent_visible_area2d(viewer.xy(), target, config, index, scene_bounds),
        Calculator::Area3d => percent_visible_area3d(viewer, target, config, index, scene_bounds),
    };
    PercentVisible::exact(percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::{Point2, Segment};
    use cover_model::{ElevationBand, Footprint, SenseKind, Wall, WallClass, WallId};

    fn scene() -> Rect {
        Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0))
    }

    #[test]
    fn scenario_one_unobstructed_los_is_fully_visible() {
        let index = ObstacleIndex::new(scene());
        let target = Token::new(
            TokenId::new(1),
            Footprint::Rect(Rect::from_min_max(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0))),
            0.0,
            1.0,
        );
        let result = percent_visible(
            Calculator::Points,
            Point3::new(1.0, 1.0, 0.0),
            None,
            &target,
            &VisibilityConfig::default(),
            &index,
            scene(),
        );
        assert_eq!(result, PercentVisible::exact(1.0));
    }

    #[test]
    fn scenario_two_wall_occludes_half_the_target_silhouette() {
        let mut index = ObstacleIndex::new(scene());
        index.upsert(cover_model::Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(5.0, 4.0), Point2::new(5.0, 7.0)),
            class: WallClass::Opaque,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let target = Token::new(
            TokenId::new(1),
            Footprint::Rect(Rect::from_min_max(Point2::new(7.0, 5.0), Point2::new(8.0, 6.0))),
            0.0,
            1.0,
        );
        let config = VisibilityConfig {
            target_point_count: 9,
            target_inset: 0.0,
            ..VisibilityConfig::default()
        };
        let result = percent_visible(
            Calculator::Area2d,
            Point3::new(1.0, 5.0, 0.0),
            None,
            &target,
            &config,
            &index,
            scene(),
        );
        assert!((result.percent - 0.5).abs() < 0.02, "percent = {}", result.percent);
    }

    #[test]
    fn scenario_four_directional_wall_wrong_side_does_not_block() {
        let mut index = ObstacleIndex::new(scene());
        index.upsert(cover_model::Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(5.0, 0.0), Point2::new(5.0, 10.0)),
            class: WallClass::Directional,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: Some(glam::vec2(-1.0, 0.0)),
        }));
        let target = Token::new(
            TokenId::new(1),
            Footprint::Rect(Rect::from_min_max(Point2::new(1.0, 4.0), Point2::new(2.0, 5.0))),
            0.0,
            1.0,
        );
        // Viewer south-east of the wall's blocking side; target is also on
        // the non-blocking side, so the wall should never intervene.
        let result = percent_visible(
            Calculator::Points,
            Point3::new(8.0, 1.0, 0.0),
            None,
            &target,
            &VisibilityConfig::default(),
            &index,
            scene(),
        );
        assert_eq!(result, PercentVisible::exact(1.0));
    }
}
