use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::core::{Group, PointRef, Scene, SeriesKind, SeriesNode};
use crate::error::ChartResult;
use crate::extensions::CoordinatorEvent;
use crate::interaction::{LegendItem, LegendMarker, MarkerShape};
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

/// Derived legend rows plus the ids currently marked highlighted.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct LegendState {
    items: Vec<LegendItem>,
    highlighted_ids: IndexSet<String>,
}

fn marker_shape(kind: SeriesKind) -> MarkerShape {
    match kind {
        SeriesKind::Line | SeriesKind::Spline => MarkerShape::Line,
        SeriesKind::XThreshold | SeriesKind::YThreshold => MarkerShape::Dashed,
        SeriesKind::Scatter | SeriesKind::Pie | SeriesKind::Donut => MarkerShape::Circle,
        SeriesKind::Area | SeriesKind::AreaSpline | SeriesKind::Column | SeriesKind::ErrorRange => {
            MarkerShape::Square
        }
    }
}

/// Error ranges ride along with the series they attach to and get no row.
fn has_legend_row(series: &SeriesNode) -> bool {
    series.kind != SeriesKind::ErrorRange
}

/// One row per series, or one per point for pie-like series.
fn legend_items(scene: &Scene, highlighted: &IndexSet<String>) -> Vec<LegendItem> {
    let mut items = Vec::new();
    for series in scene.series.iter().filter(|series| has_legend_row(series)) {
        let marker = LegendMarker {
            shape: marker_shape(series.kind),
            color: series.color.clone(),
        };
        if series.kind.is_single_value_per_position() {
            for point in &series.points {
                let id = point.key();
                items.push(LegendItem {
                    name: point.name.clone().unwrap_or_else(|| id.clone()),
                    highlighted: highlighted.contains(&id),
                    id,
                    marker: marker.clone(),
                    visible: series.visible && point.visible,
                });
            }
            continue;
        }
        let id = series.key();
        items.push(LegendItem {
            name: series.name.clone(),
            highlighted: highlighted.contains(&id),
            id,
            marker,
            visible: series.visible,
        });
    }
    items
}

fn point_legend_id(point: &PointRef) -> String {
    if point.series_kind.is_single_value_per_position() {
        point.key.point.clone()
    } else {
        point.key.series.clone()
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    #[must_use]
    pub fn legend_items(&self) -> &[LegendItem] {
        &self.legend.items
    }

    /// Legend-originated hover: highlights the item's series (or segment).
    pub fn highlight_legend_item(&mut self, id: &str) -> ChartResult<()> {
        self.scene_cache("highlight_legend_item")?;
        self.apply_highlight_ids(&[id]);
        self.highlight_legend_ids([id.to_owned()]);
        Ok(())
    }

    /// Marks the legend rows for `ids` highlighted without touching emphasis.
    /// Hosts use it to mirror highlights that originate outside the chart.
    pub fn highlight_legend_items<S: AsRef<str>>(&mut self, ids: &[S]) -> ChartResult<()> {
        self.scene_cache("highlight_legend_items")?;
        self.highlight_legend_ids(ids.iter().map(|id| id.as_ref().to_owned()));
        Ok(())
    }

    /// Ends legend hover and restores the highlight implied by the tooltip.
    pub fn clear_legend_highlight(&mut self) -> ChartResult<()> {
        self.scene_cache("clear_legend_highlight")?;
        self.apply_tooltip_highlight();
        Ok(())
    }

    /// Requests engine visibility: listed items become visible, every other
    /// legend item hidden. The legend itself changes only on the next render.
    pub fn set_items_visible<S: AsRef<str>>(&mut self, ids: &[S]) -> ChartResult<()> {
        self.scene_cache("set_items_visible")?;
        let ids: IndexSet<&str> = ids.iter().map(AsRef::as_ref).collect();

        let mut known: IndexSet<String> = IndexSet::new();
        let mut series_changes = Vec::new();
        let mut point_changes = Vec::new();
        for series in self.engine.scene().series.iter().filter(|series| has_legend_row(series)) {
            if series.kind.is_single_value_per_position() {
                for point in &series.points {
                    let id = point.key();
                    point_changes.push((point.handle, ids.contains(id.as_str())));
                    known.insert(id);
                }
                continue;
            }
            let id = series.key();
            series_changes.push((series.handle, ids.contains(id.as_str())));
            known.insert(id);
        }

        for unknown in ids.iter().filter(|id| !known.contains(**id)) {
            warn!(id = %unknown, "visibility requested for unknown legend item");
        }
        for (handle, visible) in series_changes {
            self.engine.set_series_visible(handle, visible);
        }
        for (handle, visible) in point_changes {
            self.engine.set_point_visible(handle, visible);
        }

        let visible_ids: Vec<String> = ids
            .iter()
            .filter(|id| known.contains(**id))
            .map(|id| (*id).to_owned())
            .collect();
        debug!(visible = visible_ids.len(), "item visibility requested");
        self.emit(CoordinatorEvent::VisibilityRequested { visible_ids });
        Ok(())
    }

    /// Recomputes rows from the fresh scene; emits only when they changed.
    pub(super) fn rebuild_legend(&mut self) {
        let items = legend_items(self.engine.scene(), &self.legend.highlighted_ids);
        self.replace_legend_items(items);
    }

    pub(super) fn highlight_legend_for_point(&mut self, point: &PointRef) {
        self.highlight_legend_ids([point_legend_id(point)]);
    }

    pub(super) fn highlight_legend_for_group(&mut self, group: &Group) {
        self.highlight_legend_ids(group.points.iter().map(point_legend_id));
    }

    pub(super) fn reset_legend_highlight(&mut self) {
        self.highlight_legend_ids(std::iter::empty());
    }

    fn highlight_legend_ids(&mut self, ids: impl IntoIterator<Item = String>) {
        self.legend.highlighted_ids = ids.into_iter().collect();
        let highlighted = &self.legend.highlighted_ids;
        let items = self
            .legend
            .items
            .iter()
            .map(|item| LegendItem {
                highlighted: highlighted.contains(&item.id),
                ..item.clone()
            })
            .collect();
        self.replace_legend_items(items);
    }

    fn replace_legend_items(&mut self, items: Vec<LegendItem>) {
        if items == self.legend.items {
            return;
        }
        self.legend.items = items;
        let snapshot = self.legend.items.clone();
        self.emit(CoordinatorEvent::LegendChanged(snapshot));
    }
}
