pub mod timer;
pub mod transitions;

// Re-export commonly used types for convenience
pub use timer::{Deadline, Debouncer};
pub use transitions::{ControllerSignal, TransitionOutcome, ViewController, ViewState};
