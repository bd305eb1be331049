use crate::core::{Group, PointRef};
use crate::extensions::CoordinatorEvent;
use crate::interaction::TooltipState;
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

/// Emphasis id for a point target: pie-like segments highlight themselves,
/// everything else highlights its whole series.
fn highlight_id(point: &PointRef) -> &str {
    if point.series_kind.is_single_value_per_position() {
        &point.key.point
    } else {
        &point.key.series
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Highlight, legend and unpinned tooltip for a point target.
    pub(super) fn apply_point_highlight(&mut self, point: PointRef, group: Group) {
        self.apply_highlight_ids(&[highlight_id(&point)]);
        self.highlight_legend_for_point(&point);
        let key = point.key.clone();
        self.set_tooltip_state(TooltipState {
            visible: true,
            pinned: false,
            point: Some(point),
            group: Some(group),
        });
        self.emit(CoordinatorEvent::PointHighlighted { point: key });
    }

    /// Highlight, legend and unpinned tooltip for a whole group.
    pub(super) fn apply_group_highlight(&mut self, group: Group) {
        self.apply_clear_highlight();
        self.highlight_legend_for_group(&group);
        let x = group.x;
        self.set_tooltip_state(TooltipState {
            visible: true,
            pinned: false,
            point: None,
            group: Some(group),
        });
        self.emit(CoordinatorEvent::GroupHighlighted { x });
    }

    /// Falls back to the keyboard target once hover ends, or clears everything.
    /// A pinned tooltip keeps its highlight.
    pub(super) fn settle_highlight(&mut self) {
        if self.tooltip.pinned {
            return;
        }
        if self.apply_focus_highlight() {
            return;
        }
        self.apply_clear_highlight();
        self.reset_legend_highlight();
        self.hide_unpinned_tooltip();
        self.emit(CoordinatorEvent::HighlightCleared);
    }

    /// Hides the tooltip but keeps its target so a later click can pin it.
    pub(super) fn hide_unpinned_tooltip(&mut self) {
        if self.tooltip.pinned || !self.tooltip.visible {
            return;
        }
        let next = TooltipState {
            visible: false,
            ..self.tooltip.clone()
        };
        self.set_tooltip_state(next);
    }

    /// Re-applies highlight for whatever the visible tooltip targets.
    pub(super) fn apply_tooltip_highlight(&mut self) {
        let visible = self.tooltip.visible;
        let Some(group) = self.tooltip.group.as_ref().filter(|_| visible) else {
            self.apply_clear_highlight();
            self.reset_legend_highlight();
            return;
        };
        match &self.tooltip.point {
            Some(point) => {
                let point = point.clone();
                self.apply_highlight_ids(&[highlight_id(&point)]);
                self.highlight_legend_for_point(&point);
            }
            None => {
                let group = group.clone();
                self.apply_clear_highlight();
                self.highlight_legend_for_group(&group);
            }
        }
    }
}
