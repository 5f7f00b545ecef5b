//! Constrained token silhouettes: a token's footprint clipped by the walls
//! intersecting it, built via a radial visibility sweep from the token's
//! center and memoized per `(token, sense kind)`. Spec §4.3.

mod memo;
mod silhouette;
mod visibility;

pub use memo::SilhouetteCache;
pub use silhouette::{build_silhouette, ConstrainedSilhouette};
pub use visibility::visibility_polygon;
