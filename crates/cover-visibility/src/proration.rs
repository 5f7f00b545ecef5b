use cover_model::TokenId;

/// One flagged partial-blocker token's contribution to the proration (spec
/// §4.5): its own maximum cover grant `g_i`, and the recomputed percent with
/// only this token removed (all others present).
#[derive(Debug, Clone, Copy)]
pub struct FlaggedBlocker {
    pub token_id: TokenId,
    pub maximum_cover_grant: f32,
    pub percent_minus_this: f32,
}

/// Prorates cover across partially-capped intervening tokens (spec §4.5).
///
/// `percent_all` is the percent with every blocker present; `percent_none`
/// is the percent with every flagged token removed (non-flagged blockers
/// stay). When every `Δ_i` is zero — the historical "all cancelled" case —
/// the specification resolves the resulting `0/0` by dividing by the token
/// count instead of `Σ Δ_i`, which (since `Δ_total` is then also zero)
/// still yields zero rather than propagating a `NaN`.
pub fn prorate_partial_blockers(percent_all: f32, percent_none: f32, flagged: &[FlaggedBlocker]) -> f32 {
    if flagged.is_empty() {
        return percent_none.clamp(0.0, 1.0);
    }

    let deltas: Vec<f32> = flagged
        .iter()
        .map(|b| (percent_all - b.percent_minus_this).max(0.0))
        .collect();
    let sum_deltas: f32 = deltas.iter().sum();
    let delta_total = percent_all - percent_none;

    let divisor = if sum_deltas > 0.0 {
        sum_deltas
    } else {
        flagged.len() as f32
    };

    let weighted: f32 = deltas
        .iter()
        .zip(flagged)
        .map(|(delta, blocker)| (delta / divisor) * blocker.maximum_cover_grant)
        .sum();

    (percent_none + delta_total * weighted).clamp(0.0, 1.0)
}
