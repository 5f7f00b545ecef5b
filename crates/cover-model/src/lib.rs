//! Data model shared by the obstacle index, silhouette builder, visibility
//! calculators, classifier, and cache: placeables, ids, sense kinds, and the
//! persisted-state / migration layer at the host boundary.

mod cover_effect;
mod error;
mod events;
mod frustum;
mod ids;
mod persistence;
mod placeable;
mod region;
mod sense;
mod tile;
mod token;
mod wall;

pub use cover_effect::{
    legacy_bucket, BlockerInclusion, CoverEffect, CoverEffectRecord, LegacyCoverBucket,
};
pub use error::{CoreError, CoreResult, PercentVisible};
pub use events::PlaceableEvent;
pub use frustum::Frustum;
pub use ids::{CoverEffectId, RegionId, TileId, TokenId, WallId};
pub use persistence::{migrate_token_flags, TokenFlags};
pub use placeable::{Placeable, PlaceableId, PlaceableKind};
pub use region::{Region, RegionBehavior};
pub use sense::{ActionKind, SenseKind};
pub use tile::{Tile, TileTextureState, DEFAULT_ALPHA_THRESHOLD};
pub use token::{Disposition, Footprint, Token};
pub use wall::{ElevationBand, Wall, WallClass};
