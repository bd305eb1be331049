use serde::{Deserialize, Serialize};

use crate::core::{PlotArea, PointRef, Rect};
use crate::error::ChartResult;
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipAnchorSource {
    /// Anchor reported by the engine for this point kind (e.g. a segment centroid).
    ExactAnchor,
    /// Derived from plot-area geometry and the group rectangle.
    ComputedPoint,
    GroupRect,
}

/// Where the host should attach the tooltip, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub anchor: Rect,
    pub source: TooltipAnchorSource,
}

/// Thin band through the point across the group, clamped to the plot area.
/// NaN plot edges leave the point coordinate unclamped.
fn computed_point_anchor(plot_area: PlotArea, group_rect: Rect, point: &PointRef) -> Rect {
    let plot = plot_area.rect;
    if plot_area.inverted {
        let y = point.plot.y.max(plot.top()).min(plot.bottom());
        let left = group_rect.left().max(plot.left());
        let right = group_rect.right().min(plot.right()).max(left);
        Rect::new(left, y, right - left, 0.0)
    } else {
        let x = point.plot.x.max(plot.left()).min(plot.right());
        let top = group_rect.top().max(plot.top());
        let bottom = group_rect.bottom().min(plot.bottom()).max(top);
        Rect::new(x, top, 0.0, bottom - top)
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Anchor for the visible tooltip. `None` while hidden.
    ///
    /// A target whose engine object was destroyed without a render callback
    /// hides the tooltip instead of anchoring to stale geometry.
    pub fn tooltip_placement(&mut self) -> ChartResult<Option<TooltipPlacement>> {
        let plot_area = self.scene_cache("tooltip_placement")?.plot_area();
        if self.drop_stale_tooltip() || !self.tooltip.visible {
            return Ok(None);
        }
        let Some(group) = self.tooltip.group.as_ref() else {
            return Ok(None);
        };

        let placement = match &self.tooltip.point {
            Some(point) => match self.engine.exact_point_anchor(point.handle) {
                Some(anchor) => TooltipPlacement {
                    anchor,
                    source: TooltipAnchorSource::ExactAnchor,
                },
                None => TooltipPlacement {
                    anchor: computed_point_anchor(plot_area, group.rect, point),
                    source: TooltipAnchorSource::ComputedPoint,
                },
            },
            None => TooltipPlacement {
                anchor: group.rect,
                source: TooltipAnchorSource::GroupRect,
            },
        };
        Ok(Some(placement))
    }
}
