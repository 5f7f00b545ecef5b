use cover_model::ActionKind;
use hashbrown::HashMap;

/// A per-viewer mapping `actionKind -> threshold` (spec §4.8). The
/// classifier skips any effect with `percentThreshold <= threshold`.
/// `"all"` is the default fallback key, consulted when no entry exists for
/// the requested action kind.
#[derive(Debug, Clone, Default)]
pub struct IgnoreCoverTable {
    thresholds: HashMap<ActionKind, f32>,
}

impl IgnoreCoverTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, action: ActionKind, threshold: f32) {
        self.thresholds.insert(action, threshold);
    }

    /// The ignore threshold for `action`, falling back to the `"all"` key,
    /// and finally to `0.0` (ignores nothing) if neither is set.
    pub fn threshold_for(&self, action: &ActionKind) -> f32 {
        self.thresholds
            .get(action)
            .copied()
            .or_else(|| self.thresholds.get(&ActionKind::all()).copied())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_action_overrides_all_fallback() {
        let mut table = IgnoreCoverTable::new();
        table.set(ActionKind::all(), 0.5);
        table.set(ActionKind::from("ranged"), 0.75);
        assert_eq!(table.threshold_for(&ActionKind::from("ranged")), 0.75);
        assert_eq!(table.threshold_for(&ActionKind::from("melee")), 0.5);
    }

    #[test]
    fn unset_action_and_fallback_defaults_to_zero() {
        let table = IgnoreCoverTable::new();
        assert_eq!(table.threshold_for(&ActionKind::from("ranged")), 0.0);
    }
}
