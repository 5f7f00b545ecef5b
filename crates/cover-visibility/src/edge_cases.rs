use cover_geometry::{Point2, Polygon, Rect};
use cover_model::PercentVisible;

/// The three edge cases shared by all four calculator variants (spec
/// §4.4): coincident centers, target fully outside the scene, and an empty
/// blocker set. Returns `Some` when one of them applies and the caller
/// should skip the full calculation.
///
/// The empty-blocker branch also resolves the testable-property biconditional
/// (spec §8): the invariant `percent_visible(v, t, empty_blockers) = 1` holds
/// only when the viewer isn't already inside the target's silhouette, so
/// that case is checked explicitly rather than assumed.
pub fn shared_precheck(
    viewer: Point2,
    target_center: Point2,
    target_polygon: &Polygon,
    scene_bounds: Rect,
    blockers_empty: bool,
) -> Option<PercentVisible> {
    if viewer.almost_eq(target_center) {
        return Some(PercentVisible::exact(0.0));
    }
    if !scene_bounds.intersects_rect(&target_polygon.bounding_rect()) {
        return Some(PercentVisible::exact(1.0));
    }
    if blockers_empty {
        let percent = if target_polygon.contains_point(viewer) { 0.0 } else { 1.0 };
        return Some(PercentVisible::exact(percent));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point2::new(5.0, 5.0),
            Point2::new(6.0, 5.0),
            Point2::new(6.0, 6.0),
            Point2::new(5.0, 6.0),
        ])
    }

    fn scene() -> Rect {
        Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0))
    }

    #[test]
    fn coincident_centers_return_zero() {
        let result = shared_precheck(Point2::new(5.5, 5.5), Point2::new(5.5, 5.5), &square(), scene(), false);
        assert_eq!(result, Some(PercentVisible::exact(0.0)));
    }

    #[test]
    fn target_outside_scene_returns_one() {
        let result = shared_precheck(Point2::new(1.0, 1.0), Point2::new(500.0, 500.0), &square(), scene(), false);
        assert_eq!(result, Some(PercentVisible::exact(1.0)));
    }

    #[test]
    fn empty_blockers_with_viewer_outside_target_returns_one() {
        let result = shared_precheck(Point2::new(1.0, 1.0), Point2::new(5.5, 5.5), &square(), scene(), true);
        assert_eq!(result, Some(PercentVisible::exact(1.0)));
    }

    #[test]
    fn empty_blockers_with_viewer_inside_target_returns_zero() {
        let result = shared_precheck(Point2::new(5.5, 5.5), Point2::new(5.4, 5.4), &square(), scene(), true);
        assert_eq!(result, Some(PercentVisible::exact(0.0)));
    }

    #[test]
    fn no_shortcut_applies_when_blockers_present_and_viewer_outside() {
        let result = shared_precheck(Point2::new(1.0, 1.0), Point2::new(5.5, 5.5), &square(), scene(), false);
        assert_eq!(result, None);
    }
}
