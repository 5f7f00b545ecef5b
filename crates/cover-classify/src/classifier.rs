use crate::ignore::IgnoreCoverTable;
use crate::table::CoverEffectTable;
use cover_model::{legacy_bucket, ActionKind, CoverEffectId, LegacyCoverBucket, RegionBehavior};

/// The cover set computed for a `(viewer, target, actionKind, percent)`
/// query (spec §4.7). Ordering is deterministic: ordered effects are
/// considered in descending-priority order (ties broken by id), then
/// unordered effects in id order, exactly [`CoverEffectTable`]'s stored
/// order.
fn guard_passes(percent: f32, threshold: f32, ignores: &IgnoreCoverTable, action: &ActionKind) -> bool {
    percent >= threshold && ignores.threshold_for(action) < threshold
}

/// Classifies `percent` against the installed effect table (spec §4.7
/// algorithm): walks `ordered` effects descending, emitting each that
/// clears its threshold and isn't suppressed by the viewer's ignore-cover
/// setting, stopping at the first non-overlapping emission; then walks
/// `unordered` effects, emitting each that either has the field clear
/// (current set empty) or explicitly allows overlap.
pub fn classify(percent: f32, action: &ActionKind, table: &CoverEffectTable, ignores: &IgnoreCoverTable) -> Vec<CoverEffectId> {
    let mut emitted = Vec::new();

    for effect in table.ordered() {
        if guard_passes(percent, effect.percent_threshold, ignores, action) {
            emitted.push(effect.id);
            if !effect.can_overlap {
                break;
            }
        }
    }

    for effect in table.unordered() {
        if (emitted.is_empty() || effect.can_overlap) && guard_passes(percent, effect.percent_threshold, ignores, action) {
            emitted.push(effect.id);
        }
    }

    emitted
}

/// Applies a region's "force cover" behavior over a classifier result,
/// replacing it entirely (spec §4.7 "Region override"). `None` behavior
/// leaves `computed` untouched.
pub fn apply_region_override(computed: Vec<CoverEffectId>, region_behavior: Option<&RegionBehavior>) -> Vec<CoverEffectId> {
    match region_behavior {
        Some(RegionBehavior::ForceCover(id)) => vec![*id],
        Some(RegionBehavior::None) | None => computed,
    }
}

/// Coarse legacy bucket for `percent`, computed only when the caller
/// explicitly opts in (spec §4.7 "Legacy bucketing (for compatibility)").
pub fn classify_legacy_bucket(percent: f32) -> LegacyCoverBucket {
    legacy_bucket(percent)
}
