//! Poll-driven timers.
//!
//! Nothing here sleeps. Owners pass the current time in and ask whether a
//! deadline has passed, which keeps every timer deterministic under test and
//! lets the caller pick the clock (a frame loop, a tokio timer, a test).

use crate::prelude::{Duration, Instant};

/// A single pending deadline; scheduling again replaces it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A delay past the clock's range fires on the next poll
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.at = Some(now.checked_add(delay).unwrap_or_else(|| {
            log::warn!("timer delay {:?} out of range, firing immediately", delay);
            now
        }));
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.at.is_some()
    }

    pub fn at(&self) -> Option<Instant> {
        self.at
    }

    /// Returns true exactly once, on the first poll at or after the deadline
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Collapses bursts of triggers into one firing after a quiet period
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Deadline,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: Deadline::default(),
        }
    }

    /// Restarts the quiet period; any earlier pending firing is dropped
    pub fn trigger(&mut self, now: Instant) {
        self.deadline.schedule(now, self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_pending()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.at()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.deadline.fire(now)
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_deadline_fires_once() {
        let t0 = Instant::now();
        let mut deadline = Deadline::default();
        deadline.schedule(t0, ms(100));

        assert!(!deadline.fire(t0 + ms(99)));
        assert!(deadline.fire(t0 + ms(100)));
        assert!(!deadline.fire(t0 + ms(500)));
        assert!(!deadline.is_pending());
    }

    #[test]
    fn test_deadline_overflow_fires_immediately() {
        let t0 = Instant::now();
        let mut deadline = Deadline::default();
        deadline.schedule(t0, Duration::MAX);
        assert_eq!(deadline.at(), Some(t0));
        assert!(deadline.fire(t0));
    }

    #[test]
    fn test_deadline_cancel() {
        let t0 = Instant::now();
        let mut deadline = Deadline::default();
        deadline.schedule(t0, ms(10));
        deadline.cancel();
        assert!(!deadline.fire(t0 + ms(20)));
    }

    #[test]
    fn test_debouncer_resets_on_trigger() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(200));

        debouncer.trigger(t0);
        debouncer.trigger(t0 + ms(50));
        debouncer.trigger(t0 + ms(100));

        assert!(!debouncer.poll(t0 + ms(250)));
        assert_eq!(debouncer.deadline(), Some(t0 + ms(300)));
        assert!(debouncer.poll(t0 + ms(300)));
        assert!(!debouncer.poll(t0 + ms(400)));
    }
}
