use crate::quadtree::QuadNode;
use cover_geometry::{Point2, Rect};
use cover_model::{Frustum, Placeable, PlaceableEvent, PlaceableId, PlaceableKind};
use hashbrown::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

struct Entry {
    placeable: Placeable,
    bounds: Rect,
    z_bottom: f32,
    z_top: f32,
}

/// Answers "which placeables of kind K could block sight between points P
/// and Q, or could lie within frustum F?" with no false negatives (spec
/// §4.2). Exclusively owns the indexed placeable set; mutated only by
/// [`ObstacleIndex::update`].
pub struct ObstacleIndex {
    tree: QuadNode,
    entries: HashMap<PlaceableId, Entry>,
    topology_version: AtomicU64,
}

fn z_range(placeable: &Placeable) -> (f32, f32) {
    match placeable {
        Placeable::Wall(wall) => (
            wall.elevation.bottom.unwrap_or(f32::NEG_INFINITY),
            wall.elevation.top.unwrap_or(f32::INFINITY),
        ),
        Placeable::Tile(tile) => (tile.elevation, tile.elevation),
        Placeable::Token(token) => (token.z_bottom, token.z_top),
        Placeable::Region(region) => (
            region.elevation.bottom.unwrap_or(f32::NEG_INFINITY),
            region.elevation.top.unwrap_or(f32::INFINITY),
        ),
    }
}

impl ObstacleIndex {
    pub fn new(world_bounds: Rect) -> Self {
        Self {
            tree: QuadNode::new(world_bounds),
            entries: HashMap::new(),
            topology_version: AtomicU64::new(0),
        }
    }

    pub fn topology_version(&self) -> u64 {
        self.topology_version.load(Ordering::Acquire)
    }

    fn placeable_id(placeable: &Placeable) -> PlaceableId {
        match placeable {
            Placeable::Wall(w) => PlaceableId::Wall(w.id),
            Placeable::Tile(t) => PlaceableId::Tile(t.id),
            Placeable::Token(t) => PlaceableId::Token(t.id),
            Placeable::Region(r) => PlaceableId::Region(r.id),
        }
    }

    fn kind_matches(id: PlaceableId, kinds: &[PlaceableKind]) -> bool {
        kinds.is_empty()
            || kinds.contains(&match id {
                PlaceableId::Wall(_) => PlaceableKind::Wall,
                PlaceableId::Tile(_) => PlaceableKind::Tile,
                PlaceableId::Token(_) => PlaceableKind::Token,
                PlaceableId::Region(_) => PlaceableKind::Region,
            })
    }

    /// Inserts or replaces a placeable, keyed by its own id.
    pub fn upsert(&mut self, placeable: Placeable) {
        let id = Self::placeable_id(&placeable);
        if self.entries.contains_key(&id) {
            self.tree.remove(id);
        }
        let bounds = placeable.bounding_rect();
        let (z_bottom, z_top) = z_range(&placeable);
        self.tree.insert(id, bounds);
        self.entries.insert(
            id,
            Entry {
                placeable,
                bounds,
                z_bottom,
                z_top,
            },
        );
    }

    pub fn remove(&mut self, id: PlaceableId) {
        self.tree.remove(id);
        self.entries.remove(&id);
    }

    pub fn get(&self, id: PlaceableId) -> Option<&Placeable> {
        self.entries.get(&id).map(|e| &e.placeable)
    }

    /// Applies a structural event and bumps `topology_version` for every
    /// variant except `Flagged` (spec §4.2, §9 "monotonic topology_version").
    pub fn update(&mut self, event: PlaceableEvent, placeable: Option<Placeable>) {
        match event {
            PlaceableEvent::Added(_) | PlaceableEvent::Moved(_) | PlaceableEvent::Resized(_) => {
                if let Some(placeable) = placeable {
                    self.upsert(placeable);
                }
            }
            PlaceableEvent::Flagged(_) => {
                if let Some(placeable) = placeable {
                    self.upsert(placeable);
                }
            }
            PlaceableEvent::Removed(id) => {
                self.remove(id);
            }
        }
        if event.changes_topology() {
            let version = self.topology_version.fetch_add(1, Ordering::AcqRel) + 1;
            debug!(topology_version = version, ?event, "obstacle topology changed");
        }
    }

    /// AABB-prefiltered query along segment `p`-`q` (spec §4.2
    /// `query_ray`).
    pub fn query_ray(&self, p: Point2, q: Point2, kinds: &[PlaceableKind]) -> Vec<&Placeable> {
        self.query_aabb(Rect::from_min_max(p, q).normalized(), kinds)
    }

    /// AABB-prefiltered query against an arbitrary rectangle, the primitive
    /// both `query_ray` and `query_frustum` specialize.
    pub fn query_aabb(&self, bounds: Rect, kinds: &[PlaceableKind]) -> Vec<&Placeable> {
        let mut ids = Vec::new();
        self.tree.query(&bounds, &mut ids);
        ids.into_iter()
            .filter(|id| Self::kind_matches(*id, kinds))
            .filter_map(|id| self.entries.get(&id))
            .map(|entry| &entry.placeable)
            .collect()
    }

    /// Conservative frustum query: overlap against the frustum's enclosing
    /// AABB in both xy and z (spec §4.2 `query_frustum`).
    pub fn query_frustum(&self, frustum: &Frustum, kinds: &[PlaceableKind]) -> Vec<&Placeable> {
        let (min, max) = frustum.bounding_aabb();
        let bounds_2d = Rect::from_min_max(min.xy(), max.xy());
        let mut ids = Vec::new();
        self.tree.query(&bounds_2d, &mut ids);
        ids.into_iter()
            .filter(|id| Self::kind_matches(*id, kinds))
            .filter_map(|id| self.entries.get(&id))
            .filter(|entry| entry.z_top >= min.0.z && entry.z_bottom <= max.0.z)
            .map(|entry| &entry.placeable)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::{Point3, Segment};
    use cover_model::{Wall, WallClass, WallId};

    fn wall(id: u64, x: f32) -> Placeable {
        wall_with_elevation(id, x, cover_model::ElevationBand::UNBOUNDED)
    }

    fn wall_with_elevation(id: u64, x: f32, elevation: cover_model::ElevationBand) -> Placeable {
        Placeable::Wall(Wall {
            id: WallId::new(id),
            segment: Segment::new(Point2::new(x, 0.0), Point2::new(x, 10.0)),
            class: WallClass::Opaque,
            elevation,
            restricts: vec![cover_model::SenseKind::Sight],
            directional_normal: None,
        })
    }

    #[test]
    fn query_ray_returns_only_intersecting_bounds() {
        let mut index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-100.0, -100.0), Point2::new(100.0, 100.0)));
        index.upsert(wall(1, 5.0));
        index.upsert(wall(2, 50.0));
        let hits = index.query_ray(Point2::new(0.0, 5.0), Point2::new(10.0, 5.0), &[]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn topology_version_bumps_on_add_but_not_flag() {
        let mut index = ObstacleIndex::new(Rect::from_min_max(Point2::ZERO, Point2::new(100.0, 100.0)));
        let id = PlaceableId::Wall(WallId::new(1));
        index.update(PlaceableEvent::Added(id), Some(wall(1, 5.0)));
        assert_eq!(index.topology_version(), 1);
        index.update(PlaceableEvent::Flagged(id), Some(wall(1, 5.0)));
        assert_eq!(index.topology_version(), 1);
    }

    #[test]
    fn query_frustum_filters_by_elevation() {
        let mut index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-10.0, -10.0), Point2::new(10.0, 10.0)));
        index.upsert(wall_with_elevation(
            1,
            5.0,
            cover_model::ElevationBand {
                bottom: Some(0.0),
                top: Some(2.0),
            },
        ));
        let frustum = Frustum::new(
            Point3::new(0.0, 5.0, 50.0),
            Rect::from_min_max(Point2::new(4.0, 4.0), Point2::new(6.0, 6.0)),
            100.0,
            200.0,
        );
        let hits = index.query_frustum(&frustum, &[]);
        assert!(hits.is_empty());
    }
}
