use tracing::warn;

use crate::core::{Group, PlotArea, PointRef, Rect, ScreenPoint};
use crate::interaction::FocusState;
use crate::render::{Color, RenderingEngine, ShapeHandle, ShapePrimitive, Stroke};

use super::InteractionCoordinator;

const CURSOR_STROKE: Stroke = Stroke::new(1.0, Color::rgb(0.55, 0.57, 0.6));
const FOCUS_STROKE: Stroke = Stroke::new(2.0, Color::rgb(0.0, 0.45, 0.73));
const FOCUS_PADDING_PX: f64 = 4.0;
const FOCUS_POINT_RADIUS_PX: f64 = 6.0;

/// Ad hoc shapes this coordinator owns on the engine surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct OverlayShapes {
    cursor: Option<ShapeHandle>,
    outline: Option<ShapeHandle>,
}

impl OverlayShapes {
    pub(super) fn has_any(&self) -> bool {
        self.cursor.is_some() || self.outline.is_some()
    }

    pub(super) fn remove_all<E: RenderingEngine>(&mut self, engine: &mut E) {
        for handle in [self.cursor.take(), self.outline.take()].into_iter().flatten() {
            engine.destroy_shape(handle);
        }
    }
}

fn replace_shape<E: RenderingEngine>(
    engine: &mut E,
    slot: &mut Option<ShapeHandle>,
    primitive: Option<ShapePrimitive>,
) {
    if let Some(previous) = slot.take() {
        engine.destroy_shape(previous);
    }
    let Some(primitive) = primitive else {
        return;
    };
    match engine.draw(primitive) {
        Ok(handle) => *slot = Some(handle),
        Err(err) => warn!(error = %err, "engine rejected overlay shape"),
    }
}

/// Line across the plot area through the group's position.
fn cursor_primitive(plot_area: PlotArea, group: &Group) -> ShapePrimitive {
    let rect = plot_area.rect;
    let center = group.rect.center();
    let points = if plot_area.inverted {
        vec![
            ScreenPoint::new(rect.left(), center.y),
            ScreenPoint::new(rect.right(), center.y),
        ]
    } else {
        vec![
            ScreenPoint::new(center.x, rect.top()),
            ScreenPoint::new(center.x, rect.bottom()),
        ]
    };
    ShapePrimitive::Path {
        points,
        stroke: CURSOR_STROKE,
    }
}

/// Padded band around the group, spanning the plot area across the value axis.
fn group_outline_primitive(plot_area: PlotArea, group: &Group) -> ShapePrimitive {
    let plot = plot_area.rect;
    let band = group.rect;
    let rect = if plot_area.inverted {
        Rect::new(
            plot.left(),
            band.top() - FOCUS_PADDING_PX,
            plot.width,
            band.height + 2.0 * FOCUS_PADDING_PX,
        )
    } else {
        Rect::new(
            band.left() - FOCUS_PADDING_PX,
            plot.top(),
            band.width + 2.0 * FOCUS_PADDING_PX,
            plot.height,
        )
    };
    ShapePrimitive::Rect {
        rect,
        corner_radius: 4.0,
        stroke: FOCUS_STROKE,
    }
}

fn point_outline_primitive(point: &PointRef) -> ShapePrimitive {
    ShapePrimitive::Circle {
        center: point.plot,
        radius: FOCUS_POINT_RADIUS_PX,
        stroke: FOCUS_STROKE,
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    pub(super) fn draw_group_cursor(&mut self, group: &Group) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let primitive = cursor_primitive(cache.plot_area(), group);
        replace_shape(&mut self.engine, &mut self.overlays.cursor, Some(primitive));
    }

    pub(super) fn remove_group_cursor(&mut self) {
        replace_shape(&mut self.engine, &mut self.overlays.cursor, None);
    }

    /// Draws the outline for the current focus, or removes it when the root is
    /// not focused or focus sits on the chart itself.
    pub(super) fn draw_focus_outline(&mut self) {
        let primitive = match (self.cache.as_ref(), self.navigation.root_focused) {
            (Some(cache), true) => match &self.navigation.focus {
                FocusState::Chart => None,
                FocusState::Group { group } => {
                    Some(group_outline_primitive(cache.plot_area(), group))
                }
                FocusState::Point { point, .. } => Some(point_outline_primitive(point)),
            },
            _ => None,
        };
        replace_shape(&mut self.engine, &mut self.overlays.outline, primitive);
    }

    pub(super) fn remove_focus_outline(&mut self) {
        replace_shape(&mut self.engine, &mut self.overlays.outline, None);
    }

    /// Re-draws overlays from the freshest geometry after a render.
    pub(super) fn refresh_overlays(&mut self) {
        if self.overlays.outline.is_some() {
            self.draw_focus_outline();
        }
        if self.overlays.cursor.is_some() {
            match self.pointer.hovered_group.clone() {
                Some(group) => self.draw_group_cursor(&group),
                None => self.remove_group_cursor(),
            }
        }
    }

    /// Shapes currently owned on the engine surface.
    #[must_use]
    pub fn overlay_shape_count(&self) -> usize {
        usize::from(self.overlays.cursor.is_some()) + usize::from(self.overlays.outline.is_some())
    }
}
