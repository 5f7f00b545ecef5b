mod scene;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use cover_engine::{EngineContext, EngineSettings};
use cover_geometry::Point3;
use cover_model::{ActionKind, TokenId};

use scene::SceneFile;

/// Computes line-of-sight percentage and cover classification between two
/// tokens in a scene file, against a chosen `percent_visible` algorithm.
#[derive(Debug, Parser)]
#[command(author, version, about = "Tactical line-of-sight and cover calculator")]
struct Cli {
    /// Path to a JSON scene file (walls, tokens, regions, cover effects).
    scene: PathBuf,

    /// Id of the viewing token.
    #[arg(long)]
    viewer: u64,

    /// Id of the target token.
    #[arg(long)]
    target: u64,

    /// World-space z the viewer observes from; defaults to the viewer
    /// token's own `z_bottom`.
    #[arg(long)]
    viewer_z: Option<f32>,

    /// Action kind to classify cover against, e.g. "all" or a weapon name.
    #[arg(long, default_value = "all")]
    action: String,

    #[clap(flatten)]
    settings: EngineSettings,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let file = SceneFile::load(&cli.scene)?;

    let mut engine = EngineContext::new(file.scene_bounds, cli.settings);
    for wall in file.placeable_walls() {
        engine.index.upsert(wall);
    }
    for region in &file.regions {
        engine.upsert_region(region.clone());
    }
    engine.install_cover_effects(file.cover_effects.clone())?;

    let Some(viewer) = file.token_by_id(TokenId::new(cli.viewer)) else {
        bail!("scene has no token with id {}", cli.viewer);
    };
    let Some(target) = file.token_by_id(TokenId::new(cli.target)) else {
        bail!("scene has no token with id {}", cli.target);
    };

    let viewer_center = viewer.footprint.center();
    let viewer_z = cli.viewer_z.unwrap_or(viewer.z_bottom);
    let viewer_pos = Point3::new(viewer_center.x(), viewer_center.y(), viewer_z);
    let action = ActionKind::from(cli.action.as_str());

    let visible = engine.percent_visible(Some(viewer), viewer_pos, target);
    let cover = engine.cover_for_token(viewer, viewer_pos, target, &action);

    println!("percent_visible = {:.4} (approximate: {})", visible.percent, visible.approximate);
    println!("cover_for_token = {:?}", cover.iter().map(|id| id.0).collect::<Vec<_>>());

    Ok(())
}
