use serde::{Deserialize, Serialize};

/// The category of perception used for a query; each kind has its own
/// wall-inclusion rules (spec glossary, §3 `CoverCache entry`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SenseKind {
    Sight,
    Sound,
    Move,
    Light,
}

impl SenseKind {
    pub const ALL: [SenseKind; 4] = [
        SenseKind::Sight,
        SenseKind::Sound,
        SenseKind::Move,
        SenseKind::Light,
    ];

    /// Index into a 4-slot array keyed by sense kind (spec §9: "arrays
    /// indexed by enum-valued sense kind").
    pub fn slot(self) -> usize {
        match self {
            SenseKind::Sight => 0,
            SenseKind::Sound => 1,
            SenseKind::Move => 2,
            SenseKind::Light => 3,
        }
    }
}

/// A per-viewer action-type key for the ignore-cover predicate (spec §4.8).
/// `"all"` is the default fallback key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionKind(pub String);

impl ActionKind {
    pub const ALL: &'static str = "all";

    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }
}

impl From<&str> for ActionKind {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
