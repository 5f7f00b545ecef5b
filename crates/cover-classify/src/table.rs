use cover_model::{CoreError, CoverEffect};
use tracing::warn;

/// Installed cover effects, partitioned once into `ordered` (priority > 0,
/// sorted descending) and `unordered` (priority == 0) (spec §4.7). Rebuilt
/// only when the table changes via [`CoverEffectTable::replace_all`]; the
/// `generation` counter is what `cover-cache` compares against to decide a
/// full purge (spec §4.6 "cover effect definitions changed").
pub struct CoverEffectTable {
    ordered: Vec<CoverEffect>,
    unordered: Vec<CoverEffect>,
    generation: u64,
}

impl CoverEffectTable {
    pub fn new(effects: Vec<CoverEffect>) -> Self {
        let mut table = Self {
            ordered: Vec::new(),
            unordered: Vec::new(),
            generation: 0,
        };
        table.replace_all(effects);
        table
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ordered(&self) -> &[CoverEffect] {
        &self.ordered
    }

    pub fn unordered(&self) -> &[CoverEffect] {
        &self.unordered
    }

    /// Replaces the whole installed set and bumps `generation`. Returns a
    /// diagnostic (never a hard error, per spec §7 `OverflowInvariant`) if
    /// the new table violates "within a priority class, if `canOverlap` is
    /// false, at most one effect from that class may be assigned" (spec
    /// §3) — the table is still installed either way.
    pub fn replace_all(&mut self, mut effects: Vec<CoverEffect>) -> Result<(), CoreError> {
        effects.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        let (ordered, unordered): (Vec<_>, Vec<_>) = effects.into_iter().partition(CoverEffect::is_ordered);

        let diagnostic = validate_priority_classes(&ordered);

        self.ordered = ordered;
        self.unordered = unordered;
        self.generation = self.generation.wrapping_add(1);

        if let Some(message) = diagnostic {
            warn!(%message, "cover effect table invariant violated");
            return Err(CoreError::OverflowInvariant(message));
        }
        Ok(())
    }
}

/// Checks the "at most one non-overlapping effect per priority value"
/// invariant. This is a defensive check only — the classifier's own
/// "stop on first non-overlapping emission" rule (spec §4.7) already
/// prevents more than one non-overlapping effect from ever being *emitted*,
/// regardless of what a misbuilt table contains.
fn validate_priority_classes(ordered: &[CoverEffect]) -> Option<String> {
    let mut i = 0;
    while i < ordered.len() {
        let mut j = i;
        let mut non_overlapping_count = 0;
        while j < ordered.len() && ordered[j].priority == ordered[i].priority {
            if !ordered[j].can_overlap {
                non_overlapping_count += 1;
            }
            j += 1;
        }
        if non_overlapping_count > 1 {
            return Some(format!(
                "priority class {} has {non_overlapping_count} non-overlapping effects",
                ordered[i].priority
            ));
        }
        i = j;
    }
    None
}
