//! # maplet-markers
//!
//! Declarative marker rendering for interactive maps.
//!
//! A caller hands over the full list of markers it wants on the map, plus an
//! optional one-shot fly-to target. The crate diffs that list against what is
//! already drawn and issues the minimal set of create/move/restyle/remove
//! operations through a [`MapAdapter`], the host engine's rendering surface.
//! Viewport changes coming back from the engine are debounced into
//! `ViewportChanged` events.

pub mod animation;
pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{IconConfig, MarkerMapOptions, ViewProfile, ViewTimingConfig},
    geo::{LatLng, LatLngBounds},
    map::MarkerMap,
    viewport::{TransitionId, ViewportSnapshot, ViewportTarget},
};

pub use layers::{
    icon::{marker_label, IconBuilder, IconSpec},
    marker::{Category, MarkerDescriptor, MarkerId},
    reconciler::{MarkerAction, ReconcileStats, Reconciler},
    store::{MarkerStore, RenderedMarker},
    tier::{DisplayTier, Pane, Presentation},
};

pub use animation::transitions::{ControllerSignal, TransitionOutcome, ViewController, ViewState};

pub use input::{
    events::{MapEvent, MarkerInteraction, ViewEvent},
    handler::EventManager,
};

pub use rendering::headless::{AdapterOp, HeadlessAdapter};

pub use traits::{Configurable, MapAdapter};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid marker: {0}")]
    InvalidMarker(String),

    #[error("Duplicate marker id: {0}")]
    DuplicateMarker(MarkerId),

    #[error("A viewport transition is already in progress")]
    TransitionInProgress,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Map driver has stopped")]
    DriverStopped,
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
