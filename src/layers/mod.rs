pub mod icon;
pub mod marker;
pub mod reconciler;
pub mod store;
pub mod tier;

// Re-export the essential types
pub use icon::{IconBuilder, IconSpec};
pub use marker::{Category, MarkerDescriptor, MarkerId};
pub use reconciler::{MarkerAction, ReconcileStats, Reconciler};
pub use store::{MarkerStore, RenderedMarker};
pub use tier::{DisplayTier, Pane, Presentation};
