use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds on a monotonic clock.
pub type Millis = u64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Monotonic wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Virtual clock advanced explicitly; clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta_ms: Millis) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    pub fn set(&self, now_ms: Millis) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// One logical deferred action. Scheduling always replaces the pending deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancelableTimer {
    deadline: Option<Millis>,
}

impl CancelableTimer {
    pub fn schedule(&mut self, now_ms: Millis, delay_ms: Millis) {
        self.deadline = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// Clears and reports the timer when its deadline has been reached.
    pub fn fire_if_due(&mut self, now_ms: Millis) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelableTimer, Clock, ManualClock};

    #[test]
    fn rescheduling_replaces_previous_deadline() {
        let mut timer = CancelableTimer::default();
        timer.schedule(0, 300);
        timer.schedule(100, 300);
        assert!(!timer.fire_if_due(300));
        assert!(timer.fire_if_due(400));
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = CancelableTimer::default();
        timer.schedule(0, 0);
        timer.cancel();
        assert!(!timer.fire_if_due(1_000));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let observer = clock.clone();
        clock.advance(250);
        assert_eq!(observer.now_ms(), 250);
        clock.set(10);
        assert_eq!(observer.now_ms(), 10);
    }
}
