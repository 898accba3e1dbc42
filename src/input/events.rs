use crate::core::{
    geo::LatLng,
    viewport::{TransitionId, ViewportSnapshot},
};
use crate::layers::marker::{MarkerDescriptor, MarkerId};
use serde::{Deserialize, Serialize};

/// Events the map engine reports about itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// The engine finished initializing and can take operations
    Ready,
    /// Pan ended
    MoveEnd { center: LatLng },
    /// Zoom ended
    ZoomEnd { zoom: f64 },
    /// The map canvas changed size
    Resize { width: f64, height: f64 },
    /// A fly-to animation completed; only sent by engines that can tell.
    /// `transition` is the id passed to `animate_view_to`.
    AnimationEnd { transition: TransitionId },
}

impl MapEvent {
    /// Whether this event means the visible area may have changed
    pub fn moves_viewport(&self) -> bool {
        matches!(
            self,
            MapEvent::MoveEnd { .. } | MapEvent::ZoomEnd { .. } | MapEvent::Resize { .. }
        )
    }
}

/// User interaction with a specific marker, as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerInteraction {
    Click(MarkerId),
    HoverEnter(MarkerId),
}

impl MarkerInteraction {
    pub fn marker_id(&self) -> &MarkerId {
        match self {
            MarkerInteraction::Click(id) | MarkerInteraction::HoverEnter(id) => id,
        }
    }
}

/// Events emitted to the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    /// The view settled; emitted debounced, or once at the end of a fly-to
    ViewportChanged(ViewportSnapshot),
    /// A marker was clicked
    MarkerClicked(MarkerDescriptor),
}

impl ViewEvent {
    /// Listener key used by [`EventManager`](crate::input::handler::EventManager)
    pub fn kind(&self) -> &'static str {
        match self {
            ViewEvent::ViewportChanged(_) => "viewportchanged",
            ViewEvent::MarkerClicked(_) => "markerclick",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_moving_events() {
        assert!(MapEvent::MoveEnd {
            center: LatLng::default()
        }
        .moves_viewport());
        assert!(MapEvent::ZoomEnd { zoom: 3.0 }.moves_viewport());
        assert!(MapEvent::Resize {
            width: 800.0,
            height: 600.0
        }
        .moves_viewport());
        assert!(!MapEvent::Ready.moves_viewport());
        assert!(!MapEvent::AnimationEnd {
            transition: TransitionId(1)
        }
        .moves_viewport());
    }

    #[test]
    fn test_interaction_id() {
        let id = MarkerId::from("q1");
        assert_eq!(MarkerInteraction::Click(id.clone()).marker_id(), &id);
        assert_eq!(MarkerInteraction::HoverEnter(id.clone()).marker_id(), &id);
    }
}
