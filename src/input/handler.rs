use crate::input::events::ViewEvent;
use crate::prelude::HashMap;
use std::collections::VecDeque;

type EventCallback = Box<dyn Fn(&ViewEvent) + Send + Sync>;

/// Queues outgoing events and fans them out to registered listeners
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<ViewEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener for `"viewportchanged"`, `"markerclick"` or `"*"`
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&ViewEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: ViewEvent) {
        log::trace!("queued {} event", event.kind());
        self.event_queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }

    /// Delivers all queued events to their listeners and returns them
    pub fn process_events(&mut self) -> Vec<ViewEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            for key in [event.kind(), "*"] {
                if let Some(callbacks) = self.listeners.get(key) {
                    for callback in callbacks {
                        callback(event);
                    }
                }
            }
        }

        events
    }
}
