//! Prelude module for common maplet-markers types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_markers::prelude::*;`

pub use crate::core::{
    config::{IconConfig, MarkerMapOptions, TierSizes, ViewProfile, ViewTimingConfig},
    geo::{LatLng, LatLngBounds},
    map::MarkerMap,
    viewport::{TransitionId, ViewportSnapshot, ViewportTarget},
};

pub use crate::layers::{
    icon::{IconBuilder, IconSpec},
    marker::{Category, MarkerDescriptor, MarkerId},
    reconciler::{MarkerAction, ReconcileStats, Reconciler},
    store::{MarkerStore, RenderedMarker},
    tier::{DisplayTier, Pane, Presentation},
};

pub use crate::input::{
    events::{MapEvent, MarkerInteraction, ViewEvent},
    handler::EventManager,
};

pub use crate::animation::transitions::{ViewController, ViewState};

pub use crate::rendering::headless::HeadlessAdapter;

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{drive, MapCommand, MapHandle};

pub use crate::traits::{Configurable, MapAdapter};

pub use crate::{Error as MapError, Result};

pub use instant::Instant;
pub use std::time::Duration;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
