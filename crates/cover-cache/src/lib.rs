//! Per-viewer cover cache keyed by target and sense kind, with version-based
//! invalidation on positional/topology change (spec §4.6).

mod cache;

pub use cache::{CoverCache, CoverCacheEntry};
