use anyhow::{Context, Result};
use cover_geometry::Rect;
use cover_model::{CoverEffectRecord, Placeable, Region, Token, TokenId, Wall};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk scene description the CLI loads: everything [`cover_engine::EngineContext`]
/// needs, flattened into one JSON document rather than the host's own
/// per-placeable persistence format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene_bounds: Rect,
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub cover_effects: Vec<CoverEffectRecord>,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading scene file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing scene file {}", path.display()))
    }

    pub fn placeable_walls(&self) -> impl Iterator<Item = Placeable> + '_ {
        self.walls.iter().cloned().map(Placeable::Wall)
    }

    pub fn token_by_id(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| token.id == id)
    }
}
