use tracing::trace;

use crate::interaction::{CancelableTimer, Millis};
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

/// Deferred work of one chart instance. Each slot is one logical source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct CoordinatorTimers {
    pub(super) leave: CancelableTimer,
    pub(super) overlay_refresh: CancelableTimer,
    pub(super) focus_suppression: CancelableTimer,
    pub(super) last_dismiss_at: Option<Millis>,
}

impl CoordinatorTimers {
    pub(super) fn cancel_all(&mut self) {
        self.leave.cancel();
        self.overlay_refresh.cancel();
        self.focus_suppression.cancel();
    }

    /// Whether `now` still falls inside the cooldown after the last dismissal.
    pub(super) fn in_dismiss_cooldown(&self, now_ms: Millis, cooldown_ms: Millis) -> bool {
        self.last_dismiss_at
            .is_some_and(|dismissed| now_ms.saturating_sub(dismissed) < cooldown_ms)
    }

    fn next_deadline(&self) -> Option<Millis> {
        [
            self.leave.deadline(),
            self.overlay_refresh.deadline(),
            self.focus_suppression.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Runs every timer whose deadline has passed. Returns how many fired.
    pub fn poll_timers(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut fired = 0;

        if self.timers.focus_suppression.fire_if_due(now) {
            self.navigation.suppress_focus_in = false;
            fired += 1;
        }
        if self.timers.overlay_refresh.fire_if_due(now) {
            self.refresh_overlays();
            fired += 1;
        }
        if self.timers.leave.fire_if_due(now) {
            self.finish_pointer_leave();
            fired += 1;
        }

        if fired > 0 {
            trace!(now, fired, "timers fired");
        }
        fired
    }

    /// Earliest pending deadline, for hosts that schedule their own wake-ups.
    #[must_use]
    pub fn next_timer_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn has_pending_leave(&self) -> bool {
        self.timers.leave.is_pending()
    }
}
