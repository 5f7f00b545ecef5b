use serde::{Deserialize, Serialize};

macro_rules! newtype_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

newtype_id!(TokenId);
newtype_id!(WallId);
newtype_id!(TileId);
newtype_id!(RegionId);
newtype_id!(CoverEffectId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types_with_same_raw_value() {
        let t = TokenId::new(1);
        let w = WallId::new(1);
        assert_eq!(t.0, w.0);
        assert_ne!(std::mem::size_of_val(&t), 0);
    }
}
