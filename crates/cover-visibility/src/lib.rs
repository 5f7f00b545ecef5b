//! Percent-visible calculators (spec §4.4): points sampling, 2D area, and 3D
//! area variants behind one [`Calculator`] dispatch, shared edge-case
//! handling, and partial-blocker proration (spec §4.5). The fourth variant
//! (GPU rasterized pixel count) lives in `cover-gpu`.

mod area2d;
mod area3d;
mod calculator;
mod config;
mod edge_cases;
mod face;
mod points;
mod proration;

pub use calculator::{percent_visible, Calculator};
pub use config::{BlockingFlags, TokenBlocking, VisibilityConfig};
pub use edge_cases::shared_precheck;
pub use face::{viewer_facing_faces, Face};
pub use points::sample_viewer_points;
pub use proration::{prorate_partial_blockers, FlaggedBlocker};
