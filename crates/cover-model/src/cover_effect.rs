use crate::ids::CoverEffectId;
use serde::{Deserialize, Serialize};

/// Which blocker kinds, and which token dispositions, contribute occlusion
/// credit towards this effect (spec §3 `CoverEffect`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerInclusion {
    pub walls: bool,
    pub tiles: bool,
    pub regions: bool,
    pub live_tokens: bool,
    pub dead_tokens: bool,
    pub prone_tokens: bool,
}

impl Default for BlockerInclusion {
    fn default() -> Self {
        Self {
            walls: true,
            tiles: true,
            regions: true,
            live_tokens: true,
            dead_tokens: false,
            prone_tokens: true,
        }
    }
}

/// A named cover category with a visibility threshold and priority/overlap
/// rules (spec §3 `CoverEffect`, §4.7 classifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverEffect {
    pub id: CoverEffectId,
    pub name: String,
    pub icon: String,
    pub percent_threshold: f32,
    /// `0` means unprioritized (goes into the `unordered` partition).
    pub priority: i32,
    pub can_overlap: bool,
    pub blockers: BlockerInclusion,
}

impl CoverEffect {
    pub fn is_ordered(&self) -> bool {
        self.priority > 0
    }
}

/// Legacy coarse buckets kept for host compatibility (spec §4.7 "legacy
/// bucketing"). Emitted only when a caller explicitly requests a bucket
/// rather than the full effect set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyCoverBucket {
    None,
    Low,
    Medium,
    High,
}

pub fn legacy_bucket(percent: f32) -> LegacyCoverBucket {
    if percent >= 1.0 {
        LegacyCoverBucket::High
    } else if percent >= 0.75 {
        LegacyCoverBucket::Medium
    } else if percent >= 0.5 {
        LegacyCoverBucket::Low
    } else {
        LegacyCoverBucket::None
    }
}

/// The on-disk shape of a cover effect (spec §6 "Per-cover-effect record"),
/// kept separate from [`CoverEffect`] so the persisted schema can evolve
/// independently of the in-memory type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverEffectRecord {
    pub id: CoverEffectId,
    pub name: String,
    pub icon: String,
    pub percent_threshold: f32,
    pub priority: i32,
    pub can_overlap: bool,
    pub include_walls: bool,
    pub live_tokens_block: bool,
    pub dead_tokens_block: bool,
    pub prone_tokens_block: bool,
    #[serde(default)]
    pub active_effect_data: serde_json::Value,
}

impl From<CoverEffectRecord> for CoverEffect {
    fn from(record: CoverEffectRecord) -> Self {
        CoverEffect {
            id: record.id,
            name: record.name,
            icon: record.icon,
            percent_threshold: record.percent_threshold,
            priority: record.priority,
            can_overlap: record.can_overlap,
            blockers: BlockerInclusion {
                walls: record.include_walls,
                tiles: true,
                regions: true,
                live_tokens: record.live_tokens_block,
                dead_tokens: record.dead_tokens_block,
                prone_tokens: record.prone_tokens_block,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_bucket_matches_spec_thresholds() {
        assert_eq!(legacy_bucket(1.0), LegacyCoverBucket::High);
        assert_eq!(legacy_bucket(0.8), LegacyCoverBucket::Medium);
        assert_eq!(legacy_bucket(0.6), LegacyCoverBucket::Low);
        assert_eq!(legacy_bucket(0.1), LegacyCoverBucket::None);
    }

    #[test]
    fn record_round_trips_into_effect() {
        let record = CoverEffectRecord {
            id: CoverEffectId::new(3),
            name: "Half Cover".into(),
            icon: "icons/half.svg".into(),
            percent_threshold: 0.5,
            priority: 1,
            can_overlap: false,
            include_walls: true,
            live_tokens_block: true,
            dead_tokens_block: false,
            prone_tokens_block: true,
            active_effect_data: serde_json::Value::Null,
        };
        let effect: CoverEffect = record.into();
        assert!(effect.is_ordered());
        assert!(effect.blockers.walls);
    }
}
