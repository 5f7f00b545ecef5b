use thiserror::Error;

/// Geometry-level failures. These never abort a visibility query: callers
/// treat a `Degenerate` result as "no contribution" (see spec semantics in
/// `cover-model::CoreError`, which wraps this type for the rest of the
/// engine).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),
}

pub type GeomResult<T> = Result<T, GeometryError>;
