use crate::{
    animation::transitions::{ControllerSignal, ViewController, ViewState},
    core::{
        config::MarkerMapOptions,
        viewport::{TransitionId, ViewportTarget},
    },
    input::{
        events::{MapEvent, MarkerInteraction, ViewEvent},
        handler::EventManager,
    },
    layers::{
        icon::IconBuilder,
        marker::{MarkerDescriptor, MarkerId},
        reconciler::{MarkerAction, Reconciler},
        store::MarkerStore,
    },
    prelude::Instant,
    traits::{Configurable, MapAdapter},
    Result,
};

/// A map showing a declaratively managed set of markers.
///
/// Owns the engine adapter and everything that talks to it. Two inputs drive
/// it: the desired marker list ([`set_markers`](Self::set_markers)) and a
/// one-shot fly-to target ([`set_target`](Self::set_target)). Engine events
/// and marker interactions are fed back in by the host, and
/// [`update`](Self::update) fires due timers. Output goes through the event
/// queue ([`on`](Self::on), [`process_events`](Self::process_events)).
pub struct MarkerMap<A: MapAdapter> {
    adapter: A,
    options: MarkerMapOptions,
    reconciler: Reconciler<A::Handle>,
    controller: ViewController,
    event_manager: EventManager,
    desired: Vec<MarkerDescriptor>,
    hovered: Option<MarkerId>,
    /// Fly-to waiting for the engine to become ready or the controller to go idle
    pending_target: Option<ViewportTarget>,
    /// The store is behind `desired`/`hovered`
    needs_reconcile: bool,
}

impl<A: MapAdapter> MarkerMap<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_options(adapter, MarkerMapOptions::default())
    }

    pub fn with_options(adapter: A, options: MarkerMapOptions) -> Self {
        Self {
            adapter,
            reconciler: Reconciler::new(IconBuilder::new(options.icons.clone())),
            controller: ViewController::new(options.view.clone()),
            options,
            event_manager: EventManager::new(),
            desired: Vec::new(),
            hovered: None,
            pending_target: None,
            needs_reconcile: false,
        }
    }

    /// Replaces the desired marker list and reconciles against it.
    ///
    /// An invalid list is rejected as a whole and the previous list stays in
    /// effect. While the engine is loading or a fly-to is in flight, the list
    /// is kept and applied once that is over.
    pub fn set_markers(&mut self, markers: Vec<MarkerDescriptor>) -> Result<()> {
        Reconciler::<A::Handle>::validate(&markers)?;
        self.desired = markers;
        self.needs_reconcile = true;
        self.sync()
    }

    /// Requests a fly-to. A target arriving while another transition runs,
    /// or before the engine is ready, replaces any earlier pending target and
    /// starts as soon as possible.
    pub fn set_target(&mut self, target: ViewportTarget, now: Instant) -> Result<()> {
        target.validate()?;
        if self.pending_target.replace(target).is_some() {
            log::debug!("pending viewport target superseded");
        }
        self.start_pending_transition(now)
    }

    /// Changes the hovered marker; a change triggers a full reconciliation
    pub fn set_hovered(&mut self, id: Option<MarkerId>) -> Result<()> {
        if self.hovered == id {
            return Ok(());
        }
        self.hovered = id;
        self.needs_reconcile = true;
        self.sync()
    }

    /// Entry point for clicks and hovers the engine reports on a marker
    pub fn handle_interaction(&mut self, interaction: MarkerInteraction) -> Result<()> {
        match self.reconciler.dispatch(&interaction) {
            Some(MarkerAction::Clicked(descriptor)) => {
                self.event_manager.emit(ViewEvent::MarkerClicked(descriptor));
                Ok(())
            }
            Some(MarkerAction::Hovered(id)) => self.set_hovered(Some(id)),
            None => Ok(()),
        }
    }

    /// Entry point for the engine's own events
    pub fn handle_map_event(&mut self, event: MapEvent, now: Instant) -> Result<()> {
        if event == MapEvent::Ready {
            log::info!("map engine ready");
            self.start_pending_transition(now)?;
            return self.sync();
        }
        if !self.adapter.is_ready() {
            log::trace!("ignoring {:?} from an engine that is not ready", event);
            return Ok(());
        }

        let signals = self
            .controller
            .handle_map_event(&mut self.adapter, &event, now);
        self.apply_signals(signals, now)
    }

    /// The map container changed size; re-measure once the layout settles
    pub fn invalidate_size(&mut self, now: Instant) {
        self.controller.invalidate_size(now);
    }

    /// Fires due timers: transition end, resize settle, debounce
    pub fn update(&mut self, now: Instant) -> Result<()> {
        if !self.adapter.is_ready() {
            return Ok(());
        }
        let signals = self.controller.update(&mut self.adapter, now);
        self.apply_signals(signals, now)
    }

    /// When [`update`](Self::update) next has something to do. Timers stay
    /// parked while the engine is loading.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.adapter.is_ready() {
            return None;
        }
        self.controller.next_deadline()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&ViewEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<ViewEvent> {
        self.event_manager.process_events()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn store(&self) -> &MarkerStore<A::Handle> {
        self.reconciler.store()
    }

    pub fn desired(&self) -> &[MarkerDescriptor] {
        &self.desired
    }

    pub fn hovered(&self) -> Option<&MarkerId> {
        self.hovered.as_ref()
    }

    pub fn view_state(&self) -> &ViewState {
        self.controller.state()
    }

    /// Id of the fly-to in flight; engines echo it back in `AnimationEnd`
    pub fn current_transition(&self) -> Option<TransitionId> {
        self.controller.current_transition()
    }

    pub fn pending_target(&self) -> Option<&ViewportTarget> {
        self.pending_target.as_ref()
    }

    /// Whether the store lags behind the desired list
    pub fn is_reconcile_pending(&self) -> bool {
        self.needs_reconcile
    }

    fn apply_signals(&mut self, signals: Vec<ControllerSignal>, now: Instant) -> Result<()> {
        for signal in signals {
            match signal {
                ControllerSignal::TransitionEnded => {
                    self.sync()?;
                    self.start_pending_transition(now)?;
                }
                ControllerSignal::ViewportChanged(snapshot) => {
                    self.event_manager.emit(ViewEvent::ViewportChanged(snapshot));
                }
            }
        }
        Ok(())
    }

    fn start_pending_transition(&mut self, now: Instant) -> Result<()> {
        if !self.adapter.is_ready() || self.controller.is_transitioning() {
            return Ok(());
        }
        let Some(target) = self.pending_target.take() else {
            return Ok(());
        };

        let outcome = self
            .controller
            .request_transition(&mut self.adapter, target, now)?;
        if outcome.clear_markers {
            // The old result set belongs to the old zoom; wait for a new list
            self.reconciler.clear(&mut self.adapter);
            self.desired.clear();
            self.hovered = None;
            self.needs_reconcile = false;
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        if !self.needs_reconcile {
            return Ok(());
        }
        if !self.adapter.is_ready() {
            log::debug!("map engine not ready, deferring reconciliation");
            return Ok(());
        }
        if self.controller.is_transitioning() {
            log::trace!("transition in flight, deferring reconciliation");
            return Ok(());
        }

        self.reconciler
            .reconcile(&mut self.adapter, &self.desired, self.hovered.as_ref())?;
        self.needs_reconcile = false;

        if let Some(hovered) = &self.hovered {
            if !self.reconciler.store().contains(hovered) {
                self.hovered = None;
            }
        }
        Ok(())
    }
}

impl<A: MapAdapter> Configurable for MarkerMap<A> {
    type Config = MarkerMapOptions;

    fn config(&self) -> &MarkerMapOptions {
        &self.options
    }

    fn set_config(&mut self, config: MarkerMapOptions) -> Result<()> {
        Self::validate_config(&config)?;
        self.controller.set_timing(config.view.clone());
        if config.icons != self.options.icons {
            self.reconciler.set_icon_config(config.icons.clone());
            self.needs_reconcile = true;
        }
        self.options = config;
        self.sync()
    }

    fn validate_config(config: &MarkerMapOptions) -> Result<()> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::layers::tier::{DisplayTier, Pane};
    use crate::prelude::Duration;
    use crate::rendering::headless::HeadlessAdapter;
    use crate::MapError;

    fn map() -> MarkerMap<HeadlessAdapter> {
        MarkerMap::new(HeadlessAdapter::new(LatLng::new(45.0, 9.0), 12.0, (800.0, 600.0)))
    }

    fn marker(id: &str) -> MarkerDescriptor {
        MarkerDescriptor::new(id, 45.0, 9.0, id).with_tier(DisplayTier::Dot)
    }

    #[test]
    fn test_set_markers_reconciles() {
        let mut map = map();
        map.set_markers(vec![marker("a"), marker("b")]).unwrap();
        assert_eq!(map.store().len(), 2);
        assert!(!map.is_reconcile_pending());
    }

    #[test]
    fn test_rejected_list_keeps_previous() {
        let mut map = map();
        map.set_markers(vec![marker("a")]).unwrap();
        let err = map.set_markers(vec![marker("b"), marker("b")]);
        assert!(matches!(err, Err(MapError::DuplicateMarker(_))));
        assert_eq!(map.desired().len(), 1);
        assert_eq!(map.store().all_ids(), vec![MarkerId::from("a")]);
    }

    #[test]
    fn test_hover_cleared_when_marker_leaves() {
        let mut map = map();
        map.set_markers(vec![marker("a"), marker("b")]).unwrap();
        map.handle_interaction(MarkerInteraction::HoverEnter("a".into()))
            .unwrap();
        assert_eq!(map.hovered(), Some(&MarkerId::from("a")));

        map.set_markers(vec![marker("b")]).unwrap();
        assert_eq!(map.hovered(), None);
    }

    #[test]
    fn test_click_emits_descriptor() {
        let mut map = map();
        map.set_markers(vec![marker("a").with_name("Alpha")]).unwrap();
        map.handle_interaction(MarkerInteraction::Click("a".into()))
            .unwrap();

        let events = map.process_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ViewEvent::MarkerClicked(d) if d.name.as_deref() == Some("Alpha")));
    }

    #[test]
    fn test_icon_config_change_restyles() {
        let mut map = map();
        map.set_markers(vec![marker("a")]).unwrap();
        map.update_config(|config| config.icons.base_path = "/cdn".to_string())
            .unwrap();

        let rendered = map.adapter().marker(&"a".into()).map(|m| m.icon.image_ref.clone());
        assert_eq!(rendered.as_deref(), Some("/cdn/pin.svg"));
        assert_eq!(map.adapter().marker(&"a".into()).and_then(|m| m.pane), Some(Pane::Dot));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut map = map();
        let result = map.update_config(|config| config.view.debounce_ms = 0);
        assert!(matches!(result, Err(MapError::InvalidConfig(_))));
        assert_eq!(map.config().view.debounce_ms, 200);
    }

    #[test]
    fn test_extreme_timing_does_not_overflow() {
        let mut options = MarkerMapOptions::default();
        options.view.transition_duration_ms = u64::MAX;
        let adapter = HeadlessAdapter::new(LatLng::new(45.0, 9.0), 12.0, (800.0, 600.0));
        let mut map = MarkerMap::with_options(adapter, options);

        let t0 = Instant::now();
        map.set_target(ViewportTarget::new(40.0, 10.0, 13.0), t0)
            .unwrap();
        assert!(map.next_deadline().is_some());
        map.update(t0).unwrap();
    }

    #[test]
    fn test_pending_target_waits_for_idle() {
        let t0 = Instant::now();
        let mut map = map();
        map.set_target(ViewportTarget::new(40.0, 10.0, 13.0), t0)
            .unwrap();
        map.set_target(ViewportTarget::new(41.0, 11.0, 14.0), t0 + Duration::from_millis(100))
            .unwrap();
        assert!(map.pending_target().is_some());

        map.update(t0 + Duration::from_millis(1_100)).unwrap();
        assert!(map.pending_target().is_none());
        assert!(matches!(
            map.view_state(),
            ViewState::Transitioning { target, .. } if target.zoom == 14.0
        ));
    }
}
