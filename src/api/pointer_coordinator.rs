use tracing::{debug, trace};

use crate::core::{Group, PointHandle, PointRef, ScreenPoint};
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipState;
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

/// Hover state. A direct point hover always wins over ambient group hover,
/// so at most one of the two is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PointerState {
    pub(super) hovered_point: Option<PointRef>,
    pub(super) hovered_group: Option<Group>,
}

impl PointerState {
    fn is_idle(&self) -> bool {
        self.hovered_point.is_none() && self.hovered_group.is_none()
    }
}

/// Pointer movement seen by a document-wide listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentPointerEvent {
    /// Position in the chart surface's coordinate space.
    pub position: ScreenPoint,
    /// Whether the pointer is over the tooltip's own region.
    pub inside_tooltip: bool,
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Engine callback for the pointer entering a point marker.
    pub fn on_point_hover(&mut self, point: PointHandle) -> ChartResult<()> {
        let cache = self.scene_cache("on_point_hover")?;
        let Some(point_ref) = cache.point_by_handle(point).cloned() else {
            trace!(?point, "hover on uncached point ignored");
            return Ok(());
        };
        let Some(group) = cache.group(point_ref.x).cloned() else {
            return Ok(());
        };

        self.timers.leave.cancel();
        if self
            .pointer
            .hovered_point
            .as_ref()
            .is_some_and(|current| current.key == point_ref.key)
        {
            return Ok(());
        }
        self.pointer.hovered_point = Some(point_ref.clone());
        self.pointer.hovered_group = None;
        self.remove_group_cursor();

        if self.tooltip.pinned {
            return Ok(());
        }
        self.apply_point_highlight(point_ref, group);
        Ok(())
    }

    /// Engine callback for the pointer leaving a point marker. The hide is
    /// debounced and cancelled by any hover arriving first.
    pub fn on_point_leave(&mut self) {
        if self.pointer.is_idle() {
            return;
        }
        let now = self.clock.now_ms();
        self.timers
            .leave
            .schedule(now, self.config.leave_debounce_ms);
        trace!(now, delay = self.config.leave_debounce_ms, "leave scheduled");
    }

    /// Continuous pointer movement over the plot of a cartesian chart.
    ///
    /// Ignored for pie-like charts, charts with column hit targets and while a
    /// point is hovered directly. A point whose leave is pending no longer
    /// counts as hovered, so the group under the pointer takes over.
    pub fn on_pointer_move(&mut self, position: ScreenPoint) -> ChartResult<()> {
        if !position.is_finite() {
            return Err(ChartError::InvalidData(
                "pointer position must be finite".to_owned(),
            ));
        }
        let cache = self.scene_cache("on_pointer_move")?;
        if cache.is_single_value_chart()
            || cache.has_column_targets()
            || (self.pointer.hovered_point.is_some() && !self.timers.leave.is_pending())
        {
            return Ok(());
        }
        let Some(group) = cache.nearest_group(position).cloned() else {
            return Ok(());
        };

        self.timers.leave.cancel();
        if self
            .pointer
            .hovered_group
            .as_ref()
            .is_some_and(|current| current.x == group.x)
        {
            return Ok(());
        }
        self.pointer.hovered_point = None;
        self.pointer.hovered_group = Some(group.clone());
        self.draw_group_cursor(&group);

        if self.tooltip.pinned {
            return Ok(());
        }
        self.apply_group_highlight(group);
        Ok(())
    }

    /// Engine click callback.
    ///
    /// Moves the tooltip to a new target unpinned, or pins it when the click
    /// lands on the current target. A click on the current target inside the
    /// dismiss cooldown does nothing.
    pub fn on_click(&mut self, point: Option<PointHandle>) -> ChartResult<()> {
        let now = self.clock.now_ms();
        let cache = self.scene_cache("on_click")?;

        let target_point = point
            .and_then(|handle| cache.point_by_handle(handle).cloned())
            .or_else(|| self.pointer.hovered_point.clone());
        let (target_point, group) = match target_point {
            Some(target) => match cache.group(target.x) {
                Some(group) => (Some(target), group.clone()),
                None => return Ok(()),
            },
            None => match self.pointer.hovered_group.clone() {
                Some(group) => (None, group),
                None => return Ok(()),
            },
        };

        let key = target_point.as_ref().map(|target| &target.key);
        if !self.tooltip.targets(key, group.x) {
            match target_point {
                Some(target) => self.apply_point_highlight(target, group),
                None => self.apply_group_highlight(group),
            }
            return Ok(());
        }
        if self.tooltip.pinned {
            return Ok(());
        }
        if self
            .timers
            .in_dismiss_cooldown(now, self.config.dismiss_cooldown_ms)
        {
            debug!(now, "re-pin ignored during dismiss cooldown");
            return Ok(());
        }

        debug!(x = group.x, "tooltip pinned by click");
        self.set_tooltip_state(TooltipState {
            visible: true,
            pinned: true,
            point: target_point,
            group: Some(group),
        });
        self.apply_tooltip_highlight();
        Ok(())
    }

    /// Document-wide pointer listener. Clears hover once the pointer has left
    /// both the chart surface and the tooltip, since per-point leave events
    /// are lost when the pointer crosses gaps quickly.
    pub fn on_document_pointer_move(&mut self, event: DocumentPointerEvent) {
        if event.inside_tooltip || self.pointer.is_idle() {
            return;
        }
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        if cache.surface().contains(event.position) {
            return;
        }
        trace!(position = ?event.position, "pointer left chart surface");
        self.timers.leave.cancel();
        self.clear_hover();
        self.settle_highlight();
    }

    #[must_use]
    pub fn hovered_point(&self) -> Option<&PointRef> {
        self.pointer.hovered_point.as_ref()
    }

    #[must_use]
    pub fn hovered_group(&self) -> Option<&Group> {
        self.pointer.hovered_group.as_ref()
    }

    pub(super) fn finish_pointer_leave(&mut self) {
        if self.pointer.is_idle() {
            return;
        }
        debug!("debounced leave elapsed");
        self.clear_hover();
        self.settle_highlight();
    }

    /// Re-resolves hover against the fresh cache. Hover on anything that
    /// vanished (e.g. its series was hidden) is cleared.
    pub(super) fn revalidate_pointer_hover(&mut self) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let mut lost = false;
        if let Some(point) = self.pointer.hovered_point.as_mut() {
            match cache.point(&point.key) {
                Some(fresh) => *point = fresh.clone(),
                None => lost = true,
            }
        }
        if let Some(group) = self.pointer.hovered_group.as_mut() {
            match cache.group(group.x) {
                Some(fresh) => *group = fresh.clone(),
                None => lost = true,
            }
        }
        if !lost {
            return;
        }
        debug!("hover target no longer in scene, clearing hover");
        self.timers.leave.cancel();
        self.clear_hover();
        self.settle_highlight();
    }

    fn clear_hover(&mut self) {
        self.pointer = PointerState::default();
        self.remove_group_cursor();
    }
}
