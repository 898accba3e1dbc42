pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{MapEvent, MarkerInteraction, ViewEvent};
pub use handler::EventManager;
