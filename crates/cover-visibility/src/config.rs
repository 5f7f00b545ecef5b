use cover_model::{ActionKind, SenseKind, TokenId};

/// Which disposition states of an intervening token count as a blocker
/// (spec §3 `CoverEffect`, §4.4 `blocking.tokens.{dead,live,prone}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBlocking {
    pub live: bool,
    pub dead: bool,
    pub prone: bool,
}

impl Default for TokenBlocking {
    fn default() -> Self {
        Self {
            live: true,
            dead: false,
            prone: true,
        }
    }
}

/// Which placeable kinds contribute occlusion for a given query (spec §4.4
/// `blocking.{walls, tiles, regions, tokens...}`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockingFlags {
    pub walls: bool,
    pub tiles: bool,
    pub regions: bool,
    pub tokens: TokenBlocking,
}

impl Default for BlockingFlags {
    fn default() -> Self {
        Self {
            walls: true,
            tiles: true,
            regions: true,
            tokens: TokenBlocking::default(),
        }
    }
}

/// Shared configuration for all four `percent_visible` variants (spec
/// §4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityConfig {
    pub blocking: BlockingFlags,
    pub sense_kind: SenseKind,
    pub action_kind: ActionKind,
    pub large_target: bool,
    /// `{1, 5, 9}` per spec §6 `viewerNumPoints`.
    pub viewer_point_count: u8,
    pub viewer_inset: f32,
    /// `{1, 5, 9}` per spec §6 `targetNumPoints`.
    pub target_point_count: u8,
    pub target_inset: f32,
    pub points_3d: bool,
    /// Tokens excluded from blocking regardless of `blocking.tokens` flags.
    pub excluded_tokens: Vec<TokenId>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            blocking: BlockingFlags::default(),
            sense_kind: SenseKind::Sight,
            action_kind: ActionKind::all(),
            large_target: false,
            viewer_point_count: 1,
            viewer_inset: 0.0,
            target_point_count: 9,
            target_inset: 0.05,
            points_3d: false,
            excluded_tokens: Vec::new(),
        }
    }
}
