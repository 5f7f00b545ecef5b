use clap::{Args, ValueEnum};
use cover_visibility::VisibilityConfig;

/// Which `percent_visible` calculator to try first (spec §6 `losAlgorithm`).
/// `WebGl2` and `PerPixel` both resolve to the GPU rasterized-pixel-count
/// calculator; they're kept as distinct values because the host names them
/// separately (one per rendering backend), but this engine has only one GPU
/// implementation to dispatch either of them to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LosAlgorithm {
    Points,
    Geometric,
    WebGl2,
    PerPixel,
}

impl LosAlgorithm {
    /// `true` for the two values that name a GPU-backed variant.
    pub fn is_gpu(self) -> bool {
        matches!(self, Self::WebGl2 | Self::PerPixel)
    }
}

/// Every configurable setting named in spec §6, parsed the way the source
/// engine's own `ProcessConfig` is — a plain, `Clone`able struct consumed
/// either programmatically or flattened into a `clap::Parser` CLI.
#[derive(Debug, Clone, Args)]
pub struct EngineSettings {
    #[arg(long, help_heading = "Visibility", value_enum, default_value = "points")]
    pub los_algorithm: LosAlgorithm,

    #[arg(long, help_heading = "Visibility", default_value = "1")]
    pub viewer_num_points: u8,

    #[arg(long, help_heading = "Visibility", default_value = "9")]
    pub target_num_points: u8,

    #[arg(long, help_heading = "Visibility", default_value = "0.0")]
    pub viewer_inset: f32,

    #[arg(long, help_heading = "Visibility", default_value = "0.05")]
    pub target_inset: f32,

    #[arg(long, help_heading = "Visibility", default_value = "false")]
    pub points_3d: bool,

    #[arg(long, help_heading = "Visibility", default_value = "0.75")]
    pub alpha_threshold: f32,

    #[arg(long, help_heading = "Visibility", default_value = "100")]
    pub render_texture_size: u32,

    #[arg(long, help_heading = "Visibility", default_value = "false")]
    pub large_target: bool,

    #[arg(long, help_heading = "UI", default_value = "false")]
    pub only_cover_icons: bool,

    #[arg(long, help_heading = "UI", default_value = "false")]
    pub display_cover_book: bool,

    #[arg(long, help_heading = "UI", value_enum, default_value = "attack")]
    pub icon_display_mode: IconDisplayMode,

    #[arg(long, help_heading = "UI", default_value = "false")]
    pub target_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IconDisplayMode {
    Never,
    Attack,
    Always,
    Combat,
    Combatant,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            los_algorithm: LosAlgorithm::Points,
            viewer_num_points: 1,
            target_num_points: 9,
            viewer_inset: 0.0,
            target_inset: 0.05,
            points_3d: false,
            alpha_threshold: 0.75,
            render_texture_size: 100,
            large_target: false,
            only_cover_icons: false,
            display_cover_book: false,
            icon_display_mode: IconDisplayMode::Attack,
            target_only: false,
        }
    }
}

impl EngineSettings {
    /// Builds the `cover-visibility` config these settings imply, for the
    /// in-process (non-GPU) calculators.
    pub fn visibility_config(&self) -> VisibilityConfig {
        VisibilityConfig {
            large_target: self.large_target,
            viewer_point_count: self.viewer_num_points,
            viewer_inset: self.viewer_inset,
            target_point_count: self.target_num_points,
            target_inset: self.target_inset,
            points_3d: self.points_3d,
            ..VisibilityConfig::default()
        }
    }
}
