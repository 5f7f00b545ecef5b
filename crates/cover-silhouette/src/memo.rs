use crate::silhouette::{build_silhouette, ConstrainedSilhouette};
use cover_geometry::Rect;
use cover_index::ObstacleIndex;
use cover_model::{CoreResult, SenseKind, Token, TokenId};
use hashbrown::HashMap;

struct CacheEntry {
    silhouette: ConstrainedSilhouette,
    token_version: u64,
    topology_version: u64,
}

/// Memoizes [`build_silhouette`] per `(tokenId, senseKind)`, invalidated when
/// the token's own version advances (position/size/elevation changes bump
/// it, per [`Token::bump_version`]) or the obstacle index's topology version
/// increments (spec §4.3 "Memoization key").
#[derive(Default)]
pub struct SilhouetteCache {
    entries: HashMap<(TokenId, SenseKind), CacheEntry>,
}

impl SilhouetteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        token: &Token,
        sense: SenseKind,
        index: &ObstacleIndex,
        scene_bounds: Rect,
    ) -> CoreResult<ConstrainedSilhouette> {
        let key = (token.id, sense);
        let topology_version = index.topology_version();

        if let Some(entry) = self.entries.get(&key) {
            if entry.token_version == token.version && entry.topology_version == topology_version {
                return Ok(entry.silhouette.clone());
            }
        }

        let silhouette = build_silhouette(token, sense, index, scene_bounds)?;
        self.entries.insert(
            key,
            CacheEntry {
                silhouette: silhouette.clone(),
                token_version: token.version,
                topology_version,
            },
        );
        Ok(silhouette)
    }

    pub fn invalidate_token(&mut self, token_id: TokenId) {
        self.entries.retain(|(id, _), _| *id != token_id);
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
    use cover_geometry::Point2;
    use cover_model::{Footprint, TokenId};

    fn token(version: u64) -> Token {
        let mut t = Token::new(
            TokenId::new(1),
            Footprint::Rect(cover_geometry::Rect::from_center_half_extent(
                Point2::new(5.0, 5.0),
                glam::vec2(0.5, 0.5),
            )),
            0.0,
            1.0,
        );
        t.version = version;
        t
    }

    #[test]
    fn second_call_returns_memoized_value_without_rebuilding() {
        let index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)));
        let scene = Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let mut cache = SilhouetteCache::new();
        let t = token(0);
        let first = cache.get_or_build(&t, SenseKind::Sight, &index, scene).unwrap();
        let second = cache.get_or_build(&t, SenseKind::Sight, &index, scene).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn token_version_bump_invalidates_entry() {
        let index = ObstacleIndex::new(Rect::from_min_max(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)));
        let scene = Rect::from_min_max(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let mut cache = SilhouetteCache::new();
        let t0 = token(0);
        cache.get_or_build(&t0, SenseKind::Sight, &index, scene).unwrap();
        let t1 = token(1);
        cache.get_or_build(&t1, SenseKind::Sight, &index, scene).unwrap();
        // Still one entry for this (token, sense) key, rebuilt under the new version.
        assert_eq!(cache.len(), 1);
    }
}
