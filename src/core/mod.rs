pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod viewport;

// Re-export commonly used types
pub use config::{IconConfig, MarkerMapOptions, ViewProfile, ViewTimingConfig};
pub use geo::{LatLng, LatLngBounds};
pub use map::MarkerMap;
pub use viewport::{TransitionId, ViewportSnapshot, ViewportTarget};
