use tracing::{debug, warn};

use crate::core::PointHandle;
use crate::error::ChartResult;
use crate::extensions::CoordinatorEvent;
use crate::interaction::TooltipState;
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

impl<E: RenderingEngine> InteractionCoordinator<E> {
    #[must_use]
    pub fn tooltip_state(&self) -> &TooltipState {
        &self.tooltip
    }

    /// Shows the tooltip (unpinned) on a point of the current render.
    /// Returns `false` when the point is not a cached target.
    pub fn show_tooltip_on_point(&mut self, point: PointHandle) -> ChartResult<bool> {
        let cache = self.scene_cache("show_tooltip_on_point")?;
        let Some(target) = cache.point_by_handle(point).cloned() else {
            warn!(?point, "tooltip requested for a point outside the scene cache");
            return Ok(false);
        };
        let Some(group) = cache.group(target.x).cloned() else {
            return Ok(false);
        };
        self.apply_point_highlight(target, group);
        Ok(true)
    }

    /// Shows the tooltip (unpinned) on the group at position `x`.
    pub fn show_tooltip_on_group(&mut self, x: f64) -> ChartResult<bool> {
        let cache = self.scene_cache("show_tooltip_on_group")?;
        let Some(group) = cache.group(x).cloned() else {
            warn!(x, "tooltip requested for a position outside the scene cache");
            return Ok(false);
        };
        self.apply_group_highlight(group);
        Ok(true)
    }

    /// Hides the tooltip, pinned or not, and clears the highlight it implied.
    pub fn hide_tooltip(&mut self) {
        if !self.tooltip.visible {
            return;
        }
        let next = TooltipState {
            visible: false,
            pinned: false,
            ..self.tooltip.clone()
        };
        self.set_tooltip_state(next);
        self.apply_clear_highlight();
        self.reset_legend_highlight();
        self.emit(CoordinatorEvent::HighlightCleared);
    }

    /// Dismisses a pinned tooltip. Clicks on the chart are ignored for the
    /// dismiss cooldown afterwards. A non-outside dismissal (e.g. Escape)
    /// returns the announcement to the keyboard target.
    ///
    /// Returns `false` when no tooltip was pinned.
    pub fn dismiss_pinned_tooltip(&mut self, outside_click: bool) -> bool {
        if !self.tooltip.pinned {
            return false;
        }
        let now = self.clock.now_ms();
        self.timers.last_dismiss_at = Some(now);
        debug!(now, outside_click, "pinned tooltip dismissed");
        self.hide_tooltip();
        if !outside_click && self.navigation.root_focused {
            self.announce_focus();
        }
        true
    }

    /// Hides the tooltip if its target's engine object no longer exists.
    pub(super) fn drop_stale_tooltip(&mut self) -> bool {
        let scene = self.engine.scene();
        let stale = match (&self.tooltip.point, &self.tooltip.group) {
            (Some(point), _) => scene.is_destroyed(point.handle),
            (None, Some(group)) => group
                .points
                .iter()
                .any(|point| scene.is_destroyed(point.handle)),
            (None, None) => false,
        };
        if stale {
            warn!("tooltip references a destroyed scene object, hiding tooltip");
            self.set_tooltip_state(TooltipState::default());
        }
        stale
    }
}
