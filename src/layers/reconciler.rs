//! Marker reconciliation.
//!
//! A pass takes the complete desired marker list plus the hovered id and
//! brings the map in line with it: new ids are created, known ids are patched
//! in place (position, pane, icon) and ids that disappeared are detached. The
//! store is updated alongside, so after every pass its id set equals the
//! desired list's id set.

use crate::{
    core::config::IconConfig,
    input::events::MarkerInteraction,
    layers::{
        icon::IconBuilder,
        marker::{MarkerDescriptor, MarkerId},
        store::{MarkerStore, RenderedMarker},
        tier::Presentation,
    },
    prelude::{HashMap, HashSet},
    traits::MapAdapter,
    MapError, Result,
};

/// What a marker interaction asks the owner to do
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerAction {
    /// Forward a click to the outside world
    Clicked(MarkerDescriptor),
    /// Make this marker the hovered one and re-run reconciliation
    Hovered(MarkerId),
}

/// Listener invoked with the marker's current descriptor
pub type InteractionCallback = fn(&MarkerDescriptor) -> MarkerAction;

#[derive(Clone, Copy)]
struct MarkerListeners {
    on_click: InteractionCallback,
    on_hover_enter: InteractionCallback,
}

impl MarkerListeners {
    fn standard() -> Self {
        Self {
            on_click: |descriptor| MarkerAction::Clicked(descriptor.clone()),
            on_hover_enter: |descriptor| MarkerAction::Hovered(descriptor.id.clone()),
        }
    }
}

/// Operation counts for a single pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub moved: usize,
    pub reparented: usize,
    pub restyled: usize,
    pub removed: usize,
}

impl ReconcileStats {
    /// True when the pass issued no adapter operations at all
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Diffs desired marker lists against the [`MarkerStore`] it owns
pub struct Reconciler<H> {
    store: MarkerStore<H>,
    icons: IconBuilder,
    /// Identity -> listeners, registered when a marker is created
    dispatch: HashMap<MarkerId, MarkerListeners>,
}

impl<H: Clone + std::fmt::Debug> Reconciler<H> {
    pub fn new(icons: IconBuilder) -> Self {
        Self {
            store: MarkerStore::new(),
            icons,
            dispatch: HashMap::default(),
        }
    }

    pub fn store(&self) -> &MarkerStore<H> {
        &self.store
    }

    pub fn icons(&self) -> &IconBuilder {
        &self.icons
    }

    /// Swaps the icon configuration. Markers pick it up on the next pass.
    pub fn set_icon_config(&mut self, config: IconConfig) {
        self.icons = IconBuilder::new(config);
    }

    /// Checks a desired list without touching anything: every descriptor must
    /// be well-formed and ids must be unique.
    pub fn validate(desired: &[MarkerDescriptor]) -> Result<()> {
        let mut seen = HashSet::default();
        for descriptor in desired {
            descriptor.validate()?;
            if !seen.insert(&descriptor.id) {
                return Err(MapError::DuplicateMarker(descriptor.id.clone()));
            }
        }
        Ok(())
    }

    /// Runs one reconciliation pass.
    ///
    /// The list is validated up front; an invalid list is rejected before any
    /// adapter call, leaving the map and the store as they were.
    pub fn reconcile<A>(
        &mut self,
        adapter: &mut A,
        desired: &[MarkerDescriptor],
        hovered: Option<&MarkerId>,
    ) -> Result<ReconcileStats>
    where
        A: MapAdapter<Handle = H>,
    {
        Self::validate(desired)?;

        let mut stats = ReconcileStats::default();
        let mut seen: HashSet<&MarkerId> = HashSet::default();

        for descriptor in desired {
            seen.insert(&descriptor.id);
            let presentation = Presentation::resolve(descriptor.tier, hovered == Some(&descriptor.id));
            let position = descriptor.position();
            let icon = self.icons.build(descriptor, presentation.tier);

            let Some(marker) = self.store.get_mut(&descriptor.id) else {
                let handle = adapter.create_marker(&descriptor.id, position, &icon, presentation.pane);
                self.dispatch
                    .insert(descriptor.id.clone(), MarkerListeners::standard());
                self.store.upsert(RenderedMarker {
                    descriptor: descriptor.clone(),
                    handle,
                    tier: presentation.tier,
                    pane: presentation.pane,
                    position,
                    icon,
                });
                stats.created += 1;
                continue;
            };

            if !marker.position.same_position(&position) {
                adapter.set_position(&marker.handle, position);
                marker.position = position;
                stats.moved += 1;
            }

            // Panes cannot be switched in place; the object has to be re-parented
            if marker.pane != presentation.pane {
                adapter.detach(&marker.handle);
                adapter.attach_to_pane(&marker.handle, presentation.pane);
                marker.pane = presentation.pane;
                stats.reparented += 1;
            }

            if marker.tier != presentation.tier || marker.icon != icon {
                adapter.set_icon(&marker.handle, &icon);
                marker.tier = presentation.tier;
                marker.icon = icon;
                stats.restyled += 1;
            }

            if marker.descriptor != *descriptor {
                marker.descriptor = descriptor.clone();
            }
        }

        for id in self.store.all_ids() {
            if seen.contains(&id) {
                continue;
            }
            if let Some(marker) = self.store.remove(&id) {
                adapter.detach(&marker.handle);
                adapter.release(marker.handle);
                self.dispatch.remove(&id);
                stats.removed += 1;
            }
        }

        if !stats.is_noop() {
            log::debug!(
                "reconciled {} markers: +{} ~{} ^{} *{} -{}",
                self.store.len(),
                stats.created,
                stats.moved,
                stats.reparented,
                stats.restyled,
                stats.removed
            );
        }

        Ok(stats)
    }

    /// Detaches every rendered marker and forgets it. Returns how many went.
    pub fn clear<A>(&mut self, adapter: &mut A) -> usize
    where
        A: MapAdapter<Handle = H>,
    {
        let markers = self.store.drain();
        let count = markers.len();
        for marker in markers {
            adapter.detach(&marker.handle);
            adapter.release(marker.handle);
        }
        self.dispatch.clear();
        if count > 0 {
            log::debug!("cleared {} rendered markers", count);
        }
        count
    }

    /// Routes an engine-reported interaction through the dispatch table.
    /// Interactions for markers that are no longer rendered are dropped.
    pub fn dispatch(&self, interaction: &MarkerInteraction) -> Option<MarkerAction> {
        let id = interaction.marker_id();
        let (Some(listeners), Some(marker)) = (self.dispatch.get(id), self.store.get(id)) else {
            log::debug!("ignoring {:?} for a marker that is not rendered", interaction);
            return None;
        };

        let callback = match interaction {
            MarkerInteraction::Click(_) => listeners.on_click,
            MarkerInteraction::HoverEnter(_) => listeners.on_hover_enter,
        };
        Some(callback(&marker.descriptor))
    }

    /// Whether interaction listeners are registered for `id`
    pub fn is_registered(&self, id: &MarkerId) -> bool {
        self.dispatch.contains_key(id)
    }
}

impl<H: Clone + std::fmt::Debug> Default for Reconciler<H> {
    fn default() -> Self {
        Self::new(IconBuilder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::tier::{DisplayTier, Pane};
    use crate::rendering::headless::{AdapterOp, HeadlessAdapter};

    fn marker(id: &str, tier: DisplayTier) -> MarkerDescriptor {
        MarkerDescriptor::new(id, 45.0, 9.0, id).with_tier(tier)
    }

    fn setup() -> (Reconciler<u64>, HeadlessAdapter) {
        (Reconciler::default(), HeadlessAdapter::default())
    }

    #[test]
    fn test_creates_markers_on_tier_panes() {
        let (mut reconciler, mut adapter) = setup();
        let desired = vec![marker("a", DisplayTier::Dot), marker("b", DisplayTier::Selected)];

        let stats = reconciler.reconcile(&mut adapter, &desired, None).unwrap();
        assert_eq!(stats.created, 2);
        assert_eq!(adapter.marker(&"a".into()).and_then(|m| m.pane), Some(Pane::Dot));
        assert_eq!(adapter.marker(&"b".into()).and_then(|m| m.pane), Some(Pane::Selected));
        assert!(reconciler.is_registered(&"a".into()));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let (mut reconciler, mut adapter) = setup();
        let desired = vec![marker("a", DisplayTier::Dot), marker("b", DisplayTier::Full)];
        let hovered = MarkerId::from("b");

        reconciler.reconcile(&mut adapter, &desired, Some(&hovered)).unwrap();
        adapter.clear_ops();

        let stats = reconciler.reconcile(&mut adapter, &desired, Some(&hovered)).unwrap();
        assert!(stats.is_noop());
        assert!(adapter.ops().is_empty());
    }

    #[test]
    fn test_move_only_when_position_changes() {
        let (mut reconciler, mut adapter) = setup();
        reconciler
            .reconcile(&mut adapter, &[marker("a", DisplayTier::Full)], None)
            .unwrap();
        adapter.clear_ops();

        let mut moved = marker("a", DisplayTier::Full);
        moved.lat = 46.0;
        let stats = reconciler.reconcile(&mut adapter, &[moved], None).unwrap();

        assert_eq!(stats.moved, 1);
        assert_eq!(stats.restyled, 0);
        assert_eq!(adapter.ops().len(), 1);
        assert!(matches!(adapter.ops()[0], AdapterOp::SetPosition { .. }));
    }

    #[test]
    fn test_removes_missing_ids() {
        let (mut reconciler, mut adapter) = setup();
        let desired = vec![marker("a", DisplayTier::Dot), marker("b", DisplayTier::Dot)];
        reconciler.reconcile(&mut adapter, &desired, None).unwrap();

        let stats = reconciler
            .reconcile(&mut adapter, &desired[1..], None)
            .unwrap();
        assert_eq!(stats.removed, 1);
        assert_eq!(reconciler.store().all_ids(), vec![MarkerId::from("b")]);
        assert!(!reconciler.is_registered(&"a".into()));
        assert_eq!(adapter.attached_count(), 1);
    }

    #[test]
    fn test_content_change_swaps_icon_without_tier_change() {
        let (mut reconciler, mut adapter) = setup();
        reconciler
            .reconcile(&mut adapter, &[marker("a", DisplayTier::Full)], None)
            .unwrap();
        adapter.clear_ops();

        let renamed = marker("a", DisplayTier::Full).with_name("Alpha");
        let stats = reconciler.reconcile(&mut adapter, &[renamed], None).unwrap();

        assert_eq!(stats.restyled, 1);
        assert_eq!(
            adapter.marker(&"a".into()).and_then(|m| m.icon.label.clone()),
            Some("Alpha - a".to_string())
        );
    }

    #[test]
    fn test_invalid_list_has_no_side_effects() {
        let (mut reconciler, mut adapter) = setup();
        reconciler
            .reconcile(&mut adapter, &[marker("a", DisplayTier::Full)], None)
            .unwrap();
        adapter.clear_ops();

        let bad = vec![marker("b", DisplayTier::Full), MarkerDescriptor::new("", 0.0, 0.0, "x")];
        assert!(matches!(
            reconciler.reconcile(&mut adapter, &bad, None),
            Err(MapError::InvalidMarker(_))
        ));

        let duplicated = vec![marker("c", DisplayTier::Full), marker("c", DisplayTier::Dot)];
        assert!(matches!(
            reconciler.reconcile(&mut adapter, &duplicated, None),
            Err(MapError::DuplicateMarker(id)) if id.as_str() == "c"
        ));

        assert!(adapter.ops().is_empty());
        assert_eq!(reconciler.store().all_ids(), vec![MarkerId::from("a")]);
    }

    #[test]
    fn test_dispatch_routes_to_current_descriptor() {
        let (mut reconciler, mut adapter) = setup();
        reconciler
            .reconcile(&mut adapter, &[marker("a", DisplayTier::Full)], None)
            .unwrap();

        let click = reconciler.dispatch(&MarkerInteraction::Click("a".into()));
        assert!(matches!(click, Some(MarkerAction::Clicked(d)) if d.id.as_str() == "a"));

        let hover = reconciler.dispatch(&MarkerInteraction::HoverEnter("a".into()));
        assert_eq!(hover, Some(MarkerAction::Hovered("a".into())));

        assert_eq!(reconciler.dispatch(&MarkerInteraction::Click("zzz".into())), None);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let (mut reconciler, mut adapter) = setup();
        let desired = vec![marker("a", DisplayTier::Dot), marker("b", DisplayTier::Full)];
        reconciler.reconcile(&mut adapter, &desired, None).unwrap();

        assert_eq!(reconciler.clear(&mut adapter), 2);
        assert!(reconciler.store().is_empty());
        assert_eq!(adapter.attached_count(), 0);
        assert_eq!(adapter.object_count(), 0);
        assert_eq!(reconciler.dispatch(&MarkerInteraction::Click("a".into())), None);
    }
}
