use cover_model::{CoverEffectId, TokenId};

/// Side-effect sink for icon/active-effect rendering (spec §6 "Side
/// effects"). The engine calls this but never blocks on it or inspects its
/// return value — icon rendering itself is out of scope (spec §1).
pub trait CoverUiAdapter {
    fn show_cover_icon(&self, token: TokenId, effect: CoverEffectId);
    fn hide_cover_icon(&self, token: TokenId, effect: CoverEffectId);
    fn set_active_effect(&self, token: TokenId, effect: CoverEffectId, active: bool);
}

/// An adapter that drops every call, for contexts with no UI attached (e.g.
/// the CLI, most tests).
pub struct NullUiAdapter;

impl CoverUiAdapter for NullUiAdapter {
    fn show_cover_icon(&self, _token: TokenId, _effect: CoverEffectId) {}
    fn hide_cover_icon(&self, _token: TokenId, _effect: CoverEffectId) {}
    fn set_active_effect(&self, _token: TokenId, _effect: CoverEffectId, _active: bool) {}
}
