use cover_geometry::{Point2, Rect};
use cover_model::PlaceableId;

const MAX_ENTRIES_PER_NODE: usize = 8;
const MAX_DEPTH: u32 = 8;

/// A loose quadtree: an entry whose bounds straddle more than one child
/// quadrant is kept at the ancestor node that fully encloses it, rather than
/// being duplicated across children. Query is a pure AABB overlap test —
/// the obstacle index's contract only requires no false negatives, so
/// precise shape tests happen downstream.
pub struct QuadNode {
    bounds: Rect,
    depth: u32,
    entries: Vec<(PlaceableId, Rect)>,
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            depth: 0,
            entries: Vec::new(),
            children: None,
        }
    }

    fn child_quadrants(bounds: &Rect) -> [Rect; 4] {
        let center = bounds.center();
        [
            Rect::from_min_max(bounds.min, center),
            Rect::from_min_max(Point2::new(center.x(), bounds.min.y()), Point2::new(bounds.max.x(), center.y())),
            Rect::from_min_max(Point2::new(bounds.min.x(), center.y()), Point2::new(center.x(), bounds.max.y())),
            Rect::from_min_max(center, bounds.max),
        ]
    }

    fn fully_contains(outer: &Rect, inner: &Rect) -> bool {
        outer.min.x() <= inner.min.x()
            && outer.min.y() <= inner.min.y()
            && outer.max.x() >= inner.max.x()
            && outer.max.y() >= inner.max.y()
    }

    pub fn insert(&mut self, id: PlaceableId, bounds: Rect) {
        if self.children.is_none() && self.depth < MAX_DEPTH && self.entries.len() >= MAX_ENTRIES_PER_NODE {
            self.subdivide();
        }
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                if Self::fully_contains(&child.bounds, &bounds) {
                    child.insert(id, bounds);
                    return;
                }
            }
        }
        self.entries.push((id, bounds));
    }

    fn subdivide(&mut self) {
        let quadrants = Self::child_quadrants(&self.bounds);
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            QuadNode {
                bounds: quadrants[0],
                depth,
                entries: Vec::new(),
                children: None,
            },
            QuadNode {
                bounds: quadrants[1],
                depth,
                entries: Vec::new(),
                children: None,
            },
            QuadNode {
                bounds: quadrants[2],
                depth,
                entries: Vec::new(),
                children: None,
            },
            QuadNode {
                bounds: quadrants[3],
                depth,
                entries: Vec::new(),
                children: None,
            },
        ]));
    }

    /// Remove does not rebalance (re-merge) nodes — a map this small is
    /// rebuilt wholesale often enough that shrinking the tree isn't worth
    /// the bookkeeping.
    pub fn remove(&mut self, id: PlaceableId) -> bool {
        if let Some(pos) = self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            self.entries.remove(pos);
            return true;
        }
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                if child.remove(id) {
                    return true;
                }
            }
        }
        false
    }

    pub fn query(&self, bounds: &Rect, out: &mut Vec<PlaceableId>) {
        if !self.bounds.intersects_rect(bounds) {
            return;
        }
        for (id, entry_bounds) in &self.entries {
            if entry_bounds.intersects_rect(bounds) {
                out.push(*id);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(bounds, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_model::TokenId;

    fn id(n: u64) -> PlaceableId {
        PlaceableId::Token(TokenId::new(n))
    }

    #[test]
    fn query_finds_overlapping_entries_across_subdivisions() {
        let mut root = QuadNode::new(Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0)));
        for i in 0..20u64 {
            let x = (i as f32) * 5.0;
            root.insert(id(i), Rect::from_min_max(Point2::new(x, x), Point2::new(x + 1.0, x + 1.0)));
        }
        let mut out = Vec::new();
        root.query(&Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)), &mut out);
        assert!(out.contains(&id(0)));
        assert!(!out.contains(&id(19)));
    }

    #[test]
    fn remove_drops_entry_from_subsequent_queries() {
        let mut root = QuadNode::new(Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)));
        root.insert(id(1), Rect::from_min_max(Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)));
        assert!(root.remove(id(1)));
        let mut out = Vec::new();
        root.query(&Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)), &mut out);
        assert!(out.is_empty());
    }
}
