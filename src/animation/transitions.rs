//! Viewport transitions and viewport-change notifications.
//!
//! The [`ViewController`] is a two-state machine, `Idle -> Transitioning ->
//! Idle`. A programmatic fly-to moves it into `Transitioning`. While there,
//! the engine's own move/zoom events are ignored, and exactly one
//! notification is produced when the transition ends. In `Idle`, engine
//! events are debounced so a single gesture yields a single notification.
//!
//! Each fly-to gets a fresh [`TransitionId`]. A completion event carrying any
//! other id belongs to an earlier fly-to and is dropped.

use crate::{
    animation::timer::{Deadline, Debouncer},
    core::{
        config::ViewTimingConfig,
        viewport::{TransitionId, ViewportSnapshot, ViewportTarget},
    },
    input::events::MapEvent,
    prelude::Instant,
    traits::MapAdapter,
    MapError, Result,
};

/// State of the view controller
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Transitioning {
        id: TransitionId,
        target: ViewportTarget,
        started_at: Instant,
    },
}

/// What the caller has to do after a transition was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The target zooms out: drop every rendered marker now
    pub clear_markers: bool,
}

/// Things the controller reports back from events and timers
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerSignal {
    /// A fly-to finished and the controller is idle again
    TransitionEnded,
    /// The view settled; notify listeners with this snapshot
    ViewportChanged(ViewportSnapshot),
}

pub struct ViewController {
    timing: ViewTimingConfig,
    state: ViewState,
    last_transition: TransitionId,
    /// Guaranteed end of the current transition, even without a completion event
    transition_end: Deadline,
    debounce: Debouncer,
    resize_settle: Deadline,
}

impl ViewController {
    pub fn new(timing: ViewTimingConfig) -> Self {
        Self {
            debounce: Debouncer::new(timing.debounce()),
            timing,
            state: ViewState::Idle,
            last_transition: TransitionId::default(),
            transition_end: Deadline::default(),
            resize_settle: Deadline::default(),
        }
    }

    pub fn timing(&self) -> &ViewTimingConfig {
        &self.timing
    }

    /// New timings apply to transitions and triggers started afterwards
    pub fn set_timing(&mut self, timing: ViewTimingConfig) {
        self.debounce.set_delay(timing.debounce());
        self.timing = timing;
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == ViewState::Idle
    }

    pub fn is_transitioning(&self) -> bool {
        !self.is_idle()
    }

    /// Id of the fly-to in flight, if any
    pub fn current_transition(&self) -> Option<TransitionId> {
        match &self.state {
            ViewState::Transitioning { id, .. } => Some(*id),
            ViewState::Idle => None,
        }
    }

    /// Starts a fly-to. Only valid while idle.
    pub fn request_transition<A: MapAdapter>(
        &mut self,
        adapter: &mut A,
        target: ViewportTarget,
        now: Instant,
    ) -> Result<TransitionOutcome> {
        if self.is_transitioning() {
            return Err(MapError::TransitionInProgress);
        }
        target.validate()?;

        let clear_markers = adapter.viewport().is_zoom_out(&target);
        let id = self.last_transition.next();
        log::debug!(
            "flying to ({:.5}, {:.5}) z{} as {} (clear markers: {})",
            target.center.lat,
            target.center.lng,
            target.zoom,
            id,
            clear_markers
        );

        self.debounce.cancel();
        adapter.animate_view_to(
            target.center,
            target.zoom,
            self.timing.transition_duration(),
            id,
        );
        self.transition_end
            .schedule(now, self.timing.transition_deadline());
        self.last_transition = id;
        self.state = ViewState::Transitioning {
            id,
            target,
            started_at: now,
        };

        Ok(TransitionOutcome { clear_markers })
    }

    /// Feeds an engine event into the state machine
    pub fn handle_map_event<A: MapAdapter>(
        &mut self,
        adapter: &mut A,
        event: &MapEvent,
        now: Instant,
    ) -> Vec<ControllerSignal> {
        match event {
            MapEvent::AnimationEnd { transition } => {
                if self.current_transition() == Some(*transition) {
                    self.finish_transition(adapter, now)
                } else {
                    log::debug!("ignoring animation end for stale transition {}", transition);
                    Vec::new()
                }
            }
            event if event.moves_viewport() => {
                self.request_notification(now);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Asks for a debounced viewport notification. Ignored mid-transition;
    /// the end of the transition produces its own notification.
    pub fn request_notification(&mut self, now: Instant) {
        if self.is_transitioning() {
            log::trace!("viewport signal suppressed during transition");
            return;
        }
        self.debounce.trigger(now);
    }

    /// Schedules a canvas re-measure once the container has settled
    pub fn invalidate_size(&mut self, now: Instant) {
        self.resize_settle.schedule(now, self.timing.resize_settle());
    }

    /// Fires whatever timers are due at `now`
    pub fn update<A: MapAdapter>(&mut self, adapter: &mut A, now: Instant) -> Vec<ControllerSignal> {
        let mut signals = Vec::new();

        if self.transition_end.fire(now) {
            signals.extend(self.finish_transition(adapter, now));
        }

        if self.resize_settle.fire(now) {
            adapter.invalidate_size();
            self.request_notification(now);
        }

        if self.debounce.poll(now) && self.is_idle() {
            signals.push(ControllerSignal::ViewportChanged(adapter.viewport()));
        }

        signals
    }

    /// Earliest instant at which [`update`](Self::update) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.transition_end.at(),
            self.resize_settle.at(),
            self.debounce.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn finish_transition<A: MapAdapter>(&mut self, adapter: &A, now: Instant) -> Vec<ControllerSignal> {
        if let ViewState::Transitioning { id, started_at, .. } = &self.state {
            log::debug!(
                "transition {} finished after {:?}",
                id,
                now.saturating_duration_since(*started_at)
            );
        }
        self.state = ViewState::Idle;
        self.transition_end.cancel();
        self.debounce.cancel();
        vec![
            ControllerSignal::TransitionEnded,
            ControllerSignal::ViewportChanged(adapter.viewport()),
        ]
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(ViewTimingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::prelude::Duration;
    use crate::rendering::headless::{AdapterOp, HeadlessAdapter};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn adapter_at_zoom(zoom: f64) -> HeadlessAdapter {
        HeadlessAdapter::new(LatLng::new(45.0, 9.0), zoom, (800.0, 600.0))
    }

    fn moved() -> MapEvent {
        MapEvent::MoveEnd {
            center: LatLng::new(45.0, 9.0),
        }
    }

    fn notifications(signals: &[ControllerSignal]) -> usize {
        signals
            .iter()
            .filter(|s| matches!(s, ControllerSignal::ViewportChanged(_)))
            .count()
    }

    #[test]
    fn test_transition_lifecycle() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();

        let outcome = controller
            .request_transition(&mut adapter, ViewportTarget::new(48.0, 2.0, 12.0), t0)
            .unwrap();
        assert!(!outcome.clear_markers);
        assert!(controller.is_transitioning());
        assert_eq!(
            adapter.ops(),
            &[AdapterOp::AnimateView {
                center: LatLng::new(48.0, 2.0),
                zoom: 12.0,
                duration: Duration::from_secs(1),
                transition: TransitionId(1),
            }]
        );
        assert_eq!(controller.current_transition(), Some(TransitionId(1)));

        assert!(controller.update(&mut adapter, t0 + ms(1_000)).is_empty());
        assert_eq!(controller.next_deadline(), Some(t0 + ms(1_100)));

        let signals = controller.update(&mut adapter, t0 + ms(1_100));
        assert_eq!(signals.first(), Some(&ControllerSignal::TransitionEnded));
        assert_eq!(notifications(&signals), 1);
        assert!(controller.is_idle());
        assert!(controller.update(&mut adapter, t0 + ms(5_000)).is_empty());
    }

    #[test]
    fn test_zoom_out_requests_clear() {
        let mut adapter = adapter_at_zoom(12.0);
        let mut controller = ViewController::default();
        let outcome = controller
            .request_transition(&mut adapter, ViewportTarget::new(45.0, 9.0, 8.0), Instant::now())
            .unwrap();
        assert!(outcome.clear_markers);
    }

    #[test]
    fn test_second_request_rejected_while_transitioning() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();
        controller
            .request_transition(&mut adapter, ViewportTarget::new(1.0, 1.0, 11.0), t0)
            .unwrap();

        let second =
            controller.request_transition(&mut adapter, ViewportTarget::new(2.0, 2.0, 11.0), t0 + ms(10));
        assert!(matches!(second, Err(MapError::TransitionInProgress)));
    }

    #[test]
    fn test_engine_events_suppressed_during_transition() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();
        controller
            .request_transition(&mut adapter, ViewportTarget::new(1.0, 1.0, 11.0), t0)
            .unwrap();

        for step in 1..=5 {
            controller.handle_map_event(&mut adapter, &moved(), t0 + ms(step * 100));
            controller.handle_map_event(&mut adapter, &MapEvent::ZoomEnd { zoom: 10.5 }, t0 + ms(step * 100));
        }

        let mut total = 0;
        let mut now = t0;
        while now < t0 + ms(3_000) {
            now += ms(10);
            total += notifications(&controller.update(&mut adapter, now));
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn test_debounce_collapses_burst() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();

        controller.handle_map_event(&mut adapter, &moved(), t0);
        controller.handle_map_event(&mut adapter, &moved(), t0 + ms(50));
        controller.handle_map_event(&mut adapter, &moved(), t0 + ms(100));

        assert!(controller.update(&mut adapter, t0 + ms(299)).is_empty());
        let signals = controller.update(&mut adapter, t0 + ms(300));
        assert_eq!(notifications(&signals), 1);
        assert!(controller.update(&mut adapter, t0 + ms(1_000)).is_empty());
    }

    #[test]
    fn test_animation_end_finishes_early() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();
        controller
            .request_transition(&mut adapter, ViewportTarget::new(1.0, 1.0, 11.0), t0)
            .unwrap();

        let end = MapEvent::AnimationEnd {
            transition: TransitionId(1),
        };
        let signals = controller.handle_map_event(&mut adapter, &end, t0 + ms(700));
        assert_eq!(signals.first(), Some(&ControllerSignal::TransitionEnded));
        assert_eq!(notifications(&signals), 1);
        assert!(controller.is_idle());

        // The watchdog was disarmed with it
        assert!(controller.update(&mut adapter, t0 + ms(1_200)).is_empty());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_stray_animation_end_ignored_when_idle() {
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();
        let end = MapEvent::AnimationEnd {
            transition: TransitionId(1),
        };
        let signals = controller.handle_map_event(&mut adapter, &end, Instant::now());
        assert!(signals.is_empty());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_late_animation_end_from_earlier_flight_ignored() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        let mut controller = ViewController::default();
        controller
            .request_transition(&mut adapter, ViewportTarget::new(1.0, 1.0, 11.0), t0)
            .unwrap();

        // The watchdog ends the first flight before the engine reports it
        let signals = controller.update(&mut adapter, t0 + ms(1_100));
        assert_eq!(signals.first(), Some(&ControllerSignal::TransitionEnded));
        controller
            .request_transition(&mut adapter, ViewportTarget::new(2.0, 2.0, 12.0), t0 + ms(1_100))
            .unwrap();
        assert_eq!(controller.current_transition(), Some(TransitionId(2)));

        let late = MapEvent::AnimationEnd {
            transition: TransitionId(1),
        };
        assert!(controller
            .handle_map_event(&mut adapter, &late, t0 + ms(1_150))
            .is_empty());
        assert!(controller.is_transitioning());
        assert_eq!(controller.next_deadline(), Some(t0 + ms(2_200)));

        let current = MapEvent::AnimationEnd {
            transition: TransitionId(2),
        };
        let signals = controller.handle_map_event(&mut adapter, &current, t0 + ms(1_900));
        assert_eq!(signals.first(), Some(&ControllerSignal::TransitionEnded));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_invalidate_size_settles_then_notifies() {
        let t0 = Instant::now();
        let mut adapter = adapter_at_zoom(10.0);
        adapter.resize(1200.0, 900.0);
        let mut controller = ViewController::default();

        controller.invalidate_size(t0);
        assert!(controller.update(&mut adapter, t0 + ms(299)).is_empty());
        assert_eq!(adapter.measured_size(), (800.0, 600.0));

        assert!(controller.update(&mut adapter, t0 + ms(300)).is_empty());
        assert_eq!(adapter.measured_size(), (1200.0, 900.0));

        let signals = controller.update(&mut adapter, t0 + ms(500));
        assert_eq!(notifications(&signals), 1);
    }
}
