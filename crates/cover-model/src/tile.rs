use crate::ids::TileId;
use cover_geometry::Polygon;
use serde::{Deserialize, Serialize};

/// Default alpha threshold above which a tile pixel is considered blocking
/// (spec §3 `Tile`, §6 settings `alphaThreshold`).
pub const DEFAULT_ALPHA_THRESHOLD: f32 = 0.75;

/// A rectangle/polygon with an alpha-mask texture and a single elevation
/// (spec §3 `Tile`). The alpha mask itself is host-owned; this crate only
/// tracks load state and the per-pixel sampling contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub shape: Polygon,
    pub elevation: f32,
    pub alpha_threshold: f32,
    pub texture: TileTextureState,
}

/// Texture uploads for tile alpha masks are async on first use; a tile
/// queried before its texture has finished loading contributes no blocking
/// (spec §5(b)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileTextureState {
    Loading,
    Ready,
    Failed,
}

impl Tile {
    /// Whether a sample at `alpha` (`0.0..=1.0`) blocks, honoring both the
    /// load state and the strict-`>` threshold rule (spec §9 open question:
    /// the green-channel/terrain threshold is strict `>`; the tile alpha
    /// mask uses the same convention for consistency).
    pub fn blocks_at_alpha(&self, alpha: f32) -> bool {
        match self.texture {
            TileTextureState::Ready => alpha > self.alpha_threshold,
            TileTextureState::Loading | TileTextureState::Failed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::Point2;

    fn tile(state: TileTextureState) -> Tile {
        Tile {
            id: TileId::new(1),
            shape: Polygon::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ]),
            elevation: 0.0,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            texture: state,
        }
    }

    #[test]
    fn loading_tile_never_blocks() {
        let t = tile(TileTextureState::Loading);
        assert!(!t.blocks_at_alpha(1.0));
    }

    #[test]
    fn ready_tile_uses_strict_threshold() {
        let t = tile(TileTextureState::Ready);
        assert!(!t.blocks_at_alpha(DEFAULT_ALPHA_THRESHOLD));
        assert!(t.blocks_at_alpha(DEFAULT_ALPHA_THRESHOLD + 0.01));
    }
}
