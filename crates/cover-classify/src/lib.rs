//! Cover classifier and ignore-cover predicate (spec §4.7-§4.8): converts a
//! visibility percentage into an ordered, deterministic set of cover
//! effects, honoring per-viewer ignore-cover thresholds and region "force
//! cover" overrides.

mod classifier;
mod ignore;
mod table;

pub use classifier::{apply_region_override, classify, classify_legacy_bucket};
pub use ignore::IgnoreCoverTable;
pub use table::CoverEffectTable;
