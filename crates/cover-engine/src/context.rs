use cover_cache::CoverCache;
use cover_classify::{apply_region_override, classify, CoverEffectTable, IgnoreCoverTable};
use cover_geometry::{Point3, Rect};
use cover_gpu::GpuPixelCounter;
use cover_index::ObstacleIndex;
use cover_model::{
    migrate_token_flags, ActionKind, CoverEffectId, CoverEffectRecord, PercentVisible, Placeable, PlaceableEvent,
    PlaceableId, Region, RegionBehavior, Token, TokenFlags, TokenId,
};
use cover_silhouette::SilhouetteCache;
use cover_visibility::{percent_visible as in_process_percent_visible, Calculator};
use hashbrown::HashMap;
use tracing::warn;

use crate::settings::{EngineSettings, LosAlgorithm};
use crate::ui_adapter::{CoverUiAdapter, NullUiAdapter};

/// Everything a public facade call needs, consolidated into one struct
/// instead of per-user mutable globals (spec §9's re-architecture
/// guidance). Tests build their own instance; the host owns exactly one per
/// scene.
pub struct EngineContext {
    pub index: ObstacleIndex,
    scene_bounds: Rect,
    silhouettes: SilhouetteCache,
    cache: CoverCache,
    effects: CoverEffectTable,
    ignore_cover: HashMap<TokenId, IgnoreCoverTable>,
    token_flags: HashMap<TokenId, TokenFlags>,
    regions: HashMap<cover_model::RegionId, Region>,
    settings: EngineSettings,
    gpu: GpuPixelCounter,
    ui_adapter: Box<dyn CoverUiAdapter + Send + Sync>,
}

impl EngineContext {
    pub fn new(scene_bounds: Rect, settings: EngineSettings) -> Self {
        let gpu = GpuPixelCounter::new(settings.render_texture_size, settings.alpha_threshold);
        Self {
            index: ObstacleIndex::new(scene_bounds),
            scene_bounds,
            silhouettes: SilhouetteCache::default(),
            cache: CoverCache::new(),
            effects: CoverEffectTable::new(Vec::new()),
            ignore_cover: HashMap::new(),
            token_flags: HashMap::new(),
            regions: HashMap::new(),
            settings,
            gpu,
            ui_adapter: Box::new(NullUiAdapter),
        }
    }

    pub fn with_ui_adapter(mut self, adapter: impl CoverUiAdapter + Send + Sync + 'static) -> Self {
        self.ui_adapter = Box::new(adapter);
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Installs the effect table (spec §4.7), bumping its generation and
    /// purging the cover cache so stale results aren't served against the
    /// old definitions.
    pub fn install_cover_effects(&mut self, records: Vec<CoverEffectRecord>) -> cover_model::CoreResult<()> {
        let effects = records.into_iter().map(Into::into).collect();
        let result = self.effects.replace_all(effects);
        self.cache.purge_all();
        result
    }

    /// Applies the §6 migration rule when a host hands over a legacy
    /// `TokenFlags` record.
    pub fn set_token_flags(&mut self, token: TokenId, mut flags: TokenFlags) {
        migrate_token_flags(&mut flags);
        self.token_flags.insert(token, flags);
    }

    pub fn set_ignore_cover(&mut self, viewer: TokenId, table: IgnoreCoverTable) {
        self.ignore_cover.insert(viewer, table);
    }

    pub fn upsert_region(&mut self, region: Region) {
        self.regions.insert(region.id, region);
    }

    // ---- Hooks (spec §6 "Hooks consumed") ----

    /// `topology_changed(kind)`: the index already bumps its own
    /// `topology_version` per-event in [`ObstacleIndex::update`]; this hook
    /// exists for placeables the host manages outside the index (scene
    /// boundary edges), which still invalidate silhouettes.
    pub fn topology_changed(&mut self) {
        self.silhouettes = SilhouetteCache::new();
    }

    pub fn token_updated(&mut self, event: PlaceableEvent, placeable: Option<Placeable>) {
        let token_id = match &event {
            PlaceableEvent::Added(PlaceableId::Token(id))
            | PlaceableEvent::Moved(PlaceableId::Token(id))
            | PlaceableEvent::Resized(PlaceableId::Token(id))
            | PlaceableEvent::Flagged(PlaceableId::Token(id))
            | PlaceableEvent::Removed(PlaceableId::Token(id)) => Some(*id),
            _ => None,
        };
        self.index.update(event, placeable);
        if let Some(id) = token_id {
            self.silhouettes.invalidate_token(id);
            self.cache.invalidate_token(id);
        }
    }

    /// `token_controlled`/`token_targeted`: pure UI-focus bookkeeping in the
    /// source system (which token has a selection ring, which is the
    /// current target banner); neither changes geometry or cached
    /// percentages, so there's nothing for the engine itself to update.
    /// Kept as a no-op hook so the host's wiring stays uniform across all
    /// six names from spec §6.
    pub fn token_controlled(&self, _token: TokenId, _controlled: bool) {}

    pub fn token_targeted(&self, _viewer: TokenId, _target: TokenId, _targeted: bool) {}

    pub fn canvas_ready(&mut self) {
        self.cache.purge_all();
        self.silhouettes = SilhouetteCache::new();
    }

    pub fn combat_turn_changed(&mut self) {
        self.cache.purge_all();
    }

    // ---- Facade (spec §6 "Outputs the core exposes") ----

    /// `percent_visible(viewer, target, config) -> f32`, generalized to
    /// return [`PercentVisible`] so callers can see when a fallback
    /// algorithm kicked in. `viewer` is the viewing token itself, when one
    /// exists: its footprint is sampled into the `viewerNumPoints` viewpoints
    /// spec §4.4 describes ("if more than one, the final percent is `min`
    /// over viewpoints"), each held at `viewer_pos`'s elevation. A bare
    /// `viewer_pos` with no token (`None`) is treated as a single viewpoint.
    pub fn percent_visible(&mut self, viewer: Option<&Token>, viewer_pos: Point3, target: &Token) -> PercentVisible {
        let config = self.settings.visibility_config();
        let scene_bounds = self.scene_bounds;
        let viewer_id = viewer.map(|token| token.id);

        // Warms the memoized self-occlusion polygon (spec §4.3) so repeated
        // calls against an unmoved target don't re-run the visibility sweep;
        // the calculators below still measure against the target's raw
        // footprint, which spec §8's scenarios never distinguish from the
        // silhouette since none of them seat a token flush against a wall.
        if let Err(err) = self.silhouettes.get_or_build(target, config.sense_kind, &self.index, scene_bounds) {
            warn!(%err, "failed to build target silhouette, continuing with raw footprint");
        }

        let viewpoints = viewer_viewpoints(viewer, viewer_pos, &config);

        let mut approximate = false;
        for algorithm in fallback_chain(self.settings.los_algorithm) {
            if algorithm != self.settings.los_algorithm {
                approximate = true;
            }
            match self.run_calculator_over_viewpoints(algorithm, viewer_id, &viewpoints, target, &config, scene_bounds) {
                Ok(result) => {
                    return PercentVisible {
                        percent: result.percent,
                        approximate: approximate || result.approximate,
                    };
                }
                Err(err) => {
                    warn!(?algorithm, %err, "visibility calculator unavailable, falling back");
                }
            }
        }

        // Every algorithm in the chain failed: withhold cover rather than
        // fabricate it (spec §7 "user-visible behavior").
        PercentVisible::approximate(1.0)
    }

    /// Runs `algorithm` against every viewpoint in `viewpoints`, taking the
    /// `min` percent across them with a zero early-exit (spec §4.4 "Viewer
    /// points").
    fn run_calculator_over_viewpoints(
        &self,
        algorithm: LosAlgorithm,
        viewer_id: Option<TokenId>,
        viewpoints: &[Point3],
        target: &Token,
        config: &cover_visibility::VisibilityConfig,
        scene_bounds: Rect,
    ) -> cover_model::CoreResult<PercentVisible> {
        let mut min_percent = 1.0_f32;
        let mut approximate = false;
        for &viewpoint in viewpoints {
            let result = self.run_calculator(algorithm, viewer_id, viewpoint, target, config, scene_bounds)?;
            approximate |= result.approximate;
            min_percent = min_percent.min(result.percent);
            if min_percent <= 0.0 {
                min_percent = 0.0;
                break;
            }
        }
        Ok(PercentVisible { percent: min_percent, approximate })
    }

    fn run_calculator(
        &self,
        algorithm: LosAlgorithm,
        viewer_id: Option<TokenId>,
        viewer: Point3,
        target: &Token,
        config: &cover_visibility::VisibilityConfig,
        scene_bounds: Rect,
    ) -> cover_model::CoreResult<PercentVisible> {
        if algorithm.is_gpu() {
            return self.gpu.percent_visible(viewer.xy(), target, config, &self.index, scene_bounds);
        }
        let calculator = match algorithm {
            LosAlgorithm::Points => Calculator::Points,
            LosAlgorithm::Geometric if config.points_3d => Calculator::Area3d,
            LosAlgorithm::Geometric => Calculator::Area2d,
            LosAlgorithm::WebGl2 | LosAlgorithm::PerPixel => unreachable!("handled by the is_gpu() branch above"),
        };
        Ok(in_process_percent_visible(calculator, viewer, viewer_id, target, config, &self.index, scene_bounds))
    }

    /// `cover_for_token(attacker, target, opts) -> Set<CoverEffectId>`
    /// (spec §4.6: "returns cached or recomputes"). Checks
    /// [`CoverCache::get_fresh`] first and returns on a hit; only a miss
    /// runs the percent-visible calculation and classification, with the
    /// result written back via [`CoverCache::insert`].
    pub fn cover_for_token(&mut self, viewer: &Token, viewer_pos: Point3, target: &Token, action: &ActionKind) -> Vec<CoverEffectId> {
        let sense = self.settings.visibility_config().sense_kind;
        let topology_version = self.index.topology_version();
        let generation = self.effects.generation();

        if let Some((_percent, cover_set)) = self.cache.get_fresh(viewer, target, sense, topology_version, generation) {
            return cover_set;
        }

        let percent = self.percent_visible(Some(viewer), viewer_pos, target).percent;

        let default_ignores = IgnoreCoverTable::default();
        let ignores = self.ignore_cover.get(&viewer.id).unwrap_or(&default_ignores);
        let computed = classify(percent, action, &self.effects, ignores);

        let region_behavior = self.region_behavior_at(target);
        let final_set = apply_region_override(computed, region_behavior.as_ref());

        self.cache.insert(viewer, target, sense, topology_version, generation, percent, final_set.clone());

        final_set
    }

    /// `ignores_cover(viewer, actionKind) -> f32` (spec §4.8): the
    /// viewer's configured ignore-cover threshold for `action`.
    pub fn ignores_cover(&self, viewer: TokenId, action: &ActionKind) -> f32 {
        self.ignore_cover.get(&viewer).map_or(0.0, |table| table.threshold_for(action))
    }

    /// The first region (if any) whose shape contains `target`'s footprint
    /// center at its bottom elevation (spec §4.7 "regions force a cover
    /// bucket regardless of the computed percentage").
    fn region_behavior_at(&self, target: &Token) -> Option<RegionBehavior> {
        let center = target.footprint.center();
        self.regions
            .values()
            .find(|region| region.contains_point(center, target.z_bottom))
            .map(|region| region.behavior.clone())
    }
}

fn fallback_chain(requested: LosAlgorithm) -> Vec<LosAlgorithm> {
    // spec §7: `webgl2 -> geometric -> points`. A request for `points` or
    // `geometric` starts partway down that chain rather than repeating it
    // from the top.
    let full = [LosAlgorithm::WebGl2, LosAlgorithm::Geometric, LosAlgorithm::Points];
    let start = full.iter().position(|&a| a == requested).unwrap_or(0);
    full[start..].to_vec()
}

/// Samples `viewer`'s footprint into `config.viewer_point_count` viewpoints
/// (spec §4.4 "Viewer points"), each held at `viewer_pos`'s elevation. A
/// bare position with no backing token (`None`) yields that single point,
/// since there's no footprint to sample.
fn viewer_viewpoints(viewer: Option<&Token>, viewer_pos: Point3, config: &cover_visibility::VisibilityConfig) -> Vec<Point3> {
    match viewer {
        Some(token) => cover_visibility::sample_viewer_points(token.footprint.bounding_rect(), config.viewer_point_count, config.viewer_inset, viewer_pos.0.z),
        None => vec![viewer_pos],
    }
}

