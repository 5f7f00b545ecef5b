use cover_model::{CoverEffectId, SenseKind, Token, TokenId};
use hashbrown::HashMap;
use tracing::debug;

/// A cached `(percent, coverSet)` pair plus the versions it was computed
/// against (spec §3 `CoverCache entry`). A read comparing its own live
/// versions against these decides whether the entry is still fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverCacheEntry {
    pub percent: f32,
    pub cover_set: Vec<CoverEffectId>,
    viewer_version: u64,
    target_version: u64,
    topology_version: u64,
    cover_table_generation: u64,
}

type CacheKey = (TokenId, TokenId, SenseKind);

/// Per-viewer map of target -> `(percent, coverSet)`, keyed by
/// `(viewerId, targetId, senseKind)` (spec §3, §4.6). Invalidation is
/// version-based rather than listener-driven (spec §9): a stale read just
/// recomputes under the calling thread, per §4.6's consistency rule ("no
/// partial writes are observable").
#[derive(Default)]
pub struct CoverCache {
    entries: HashMap<CacheKey, CoverCacheEntry>,
}

impl CoverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(entry: &CoverCacheEntry, viewer: &Token, target: &Token, topology_version: u64, cover_table_generation: u64) -> bool {
        entry.viewer_version == viewer.version
            && entry.target_version == target.version
            && entry.topology_version == topology_version
            && entry.cover_table_generation == cover_table_generation
    }

    /// Returns the cached `(percent, coverSet)` for `(viewer, target,
    /// sense)` if every version still matches (spec §4.6
    /// `coverPercentFromAttacker`/`coverEffectsFromAttacker`, generalized to
    /// return both at once since they share one recomputation), else `None`.
    /// Split from the write side (see [`Self::insert`]) so a caller can run
    /// its own recomputation — which may itself need a mutable borrow of
    /// whatever owns this cache — without borrowing through a closure.
    pub fn get_fresh(&self, viewer: &Token, target: &Token, sense: SenseKind, topology_version: u64, cover_table_generation: u64) -> Option<(f32, Vec<CoverEffectId>)> {
        let key = (viewer.id, target.id, sense);
        let entry = self.entries.get(&key)?;
        Self::is_fresh(entry, viewer, target, topology_version, cover_table_generation).then(|| (entry.percent, entry.cover_set.clone()))
    }

    /// Stores a freshly computed `(percent, coverSet)` against the versions
    /// it was computed with.
    pub fn insert(&mut self, viewer: &Token, target: &Token, sense: SenseKind, topology_version: u64, cover_table_generation: u64, percent: f32, cover_set: Vec<CoverEffectId>) {
        let key = (viewer.id, target.id, sense);
        self.entries.insert(
            key,
            CoverCacheEntry {
                percent,
                cover_set,
                viewer_version: viewer.version,
                target_version: target.version,
                topology_version,
                cover_table_generation,
            },
        );
    }

    /// Wipes every entry where `token_id` appears as viewer or target (spec
    /// §4.6 "viewer or target moved/resized ⇒ wipe entries for that token
    /// pair").
    pub fn invalidate_token(&mut self, token_id: TokenId) {
        self.entries.retain(|(viewer, target, _), _| *viewer != token_id && *target != token_id);
    }

    /// Full purge, for when cover effect definitions change (spec §4.6).
    pub fn purge_all(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(purged = count, "cover cache fully purged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::{Point2, Rect};
    use cover_model::Footprint;

    fn token(id: u64, version: u64) -> Token {
        let mut t = Token::new(
            TokenId::new(id),
            Footprint::Rect(Rect::from_center_half_extent(Point2::new(0.0, 0.0), glam::vec2(0.5, 0.5))),
            0.0,
            1.0,
        );
        t.version = version;
        t
    }

    #[test]
    fn idempotent_under_frozen_topology() {
        let mut cache = CoverCache::new();
        let viewer = token(1, 0);
        let target = token(2, 0);
        assert!(cache.get_fresh(&viewer, &target, SenseKind::Sight, 0, 0).is_none());
        cache.insert(&viewer, &target, SenseKind::Sight, 0, 0, 0.5, vec![CoverEffectId::new(1)]);

        let first = cache.get_fresh(&viewer, &target, SenseKind::Sight, 0, 0);
        let second = cache.get_fresh(&viewer, &target, SenseKind::Sight, 0, 0);
        assert_eq!(first, second);
        assert_eq!(first, Some((0.5, vec![CoverEffectId::new(1)])), "second read should have hit the cache");
    }

    #[test]
    fn target_version_bump_forces_recompute() {
        let mut cache = CoverCache::new();
        let viewer = token(1, 0);
        cache.insert(&viewer, &token(2, 0), SenseKind::Sight, 0, 0, 0.5, Vec::new());
        assert!(cache.get_fresh(&viewer, &token(2, 1), SenseKind::Sight, 0, 0).is_none(), "bumped target version should miss");
    }

    #[test]
    fn topology_version_bump_forces_recompute() {
        let mut cache = CoverCache::new();
        let viewer = token(1, 0);
        let target = token(2, 0);
        cache.insert(&viewer, &target, SenseKind::Sight, 0, 0, 0.5, Vec::new());
        assert!(cache.get_fresh(&viewer, &target, SenseKind::Sight, 1, 0).is_none(), "bumped topology version should miss");
    }

    #[test]
    fn invalidate_token_wipes_entries_for_that_pair() {
        let mut cache = CoverCache::new();
        let viewer = token(1, 0);
        let target = token(2, 0);
        cache.insert(&viewer, &target, SenseKind::Sight, 0, 0, 0.5, Vec::new());
        assert_eq!(cache.len(), 1);
        cache.invalidate_token(TokenId::new(2));
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_all_clears_every_entry_regardless_of_versions() {
        let mut cache = CoverCache::new();
        let viewer = token(1, 0);
        let target = token(2, 0);
        cache.insert(&viewer, &target, SenseKind::Sight, 0, 0, 0.5, Vec::new());
        cache.purge_all();
        assert!(cache.is_empty());
    }
}
