use cover_geometry::GeometryError;
use thiserror::Error;

/// Engine-wide error kinds, spec §7. None of these abort a render frame:
/// every query is a self-contained transaction and partial failures degrade
/// accuracy, not correctness of behavior.
#[derive(Debug, Error, Clone)]
pub enum CoreError {
    /// Zero-area polygon, collinear viewer/target, or zero-length wall.
    /// Treated as "no contribution"; logged once per event, never
    /// propagated further than the calculator that hit it.
    #[error("degenerate geometry: {0}")]
    Degenerate(#[from] GeometryError),

    /// GPU context lost, or a tile texture failed to load. The calculator
    /// falls back to the next algorithm in the chain and flags its result
    /// `approximate: true`.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A placeable id referenced by a query no longer exists. Returns an
    /// empty cover set; no cache entry is written.
    #[error("placeable not found: {0}")]
    NotFound(String),

    /// The installed cover-effect table violates the priority/overlap
    /// invariant. The classifier still emits its partial result; this is a
    /// diagnostic, not a hard failure.
    #[error("cover effect table invariant violated: {0}")]
    OverflowInvariant(String),

    /// An async GPU readback was cancelled. No cache write happens; callers
    /// may retry.
    #[error("operation cancelled")]
    Cancelled,
}

pub type CoreResult<T> = Result<T, CoreError>;

/// A calculator's result, carrying whether it came from a fallback
/// algorithm (spec §7: `ResourceUnavailable` results are flagged
/// `approximate: true`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentVisible {
    pub percent: f32,
    pub approximate: bool,
}

impl PercentVisible {
    pub fn exact(percent: f32) -> Self {
        Self {
            percent,
            approximate: false,
        }
    }

    pub fn approximate(percent: f32) -> Self {
        Self {
            percent,
            approximate: true,
        }
    }
}
