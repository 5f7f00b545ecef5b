//! Spatial index over walls, tiles, tokens, and regions: a loose quadtree
//! keyed by bounding rectangle, with a monotonic topology version consumers
//! compare against cached results. Spec §4.2.

mod index;
mod quadtree;

pub use index::ObstacleIndex;
