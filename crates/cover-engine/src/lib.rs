//! Facade crate wiring the obstacle index, silhouette cache, visibility
//! calculators, classifier, and cover cache into the single entry point a
//! host program drives (spec §6, §9). Everything a caller needs lives on
//! [`EngineContext`]; the sibling crates stay composable on their own.

mod context;
mod settings;
mod ui_adapter;

pub use context::EngineContext;
pub use settings::{EngineSettings, IconDisplayMode, LosAlgorithm};
pub use ui_adapter::{CoverUiAdapter, NullUiAdapter};
