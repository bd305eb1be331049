use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{PointRef, Scene, SeriesKind, ValueRange};
use crate::error::ChartResult;
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

/// Which error-range series attach to which series, resolved per render.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct ErrorRangeLinks {
    by_target: IndexMap<String, Vec<String>>,
    warned: IndexSet<(String, String)>,
}

impl ErrorRangeLinks {
    /// An error range without an explicit link attaches to the closest
    /// preceding navigable series. Broken links are warned about once.
    pub(super) fn resolve(&mut self, scene: &Scene) {
        self.by_target.clear();
        let mut preceding: Option<String> = None;
        for series in &scene.series {
            if series.kind.is_navigable() {
                preceding = Some(series.key());
                continue;
            }
            if series.kind != SeriesKind::ErrorRange {
                continue;
            }
            let range_key = series.key();
            let target = match series.linked_to.as_deref() {
                Some(link) if scene.series_by_key(link).is_some() => Some(link.to_owned()),
                Some(link) => {
                    if self.warned.insert((range_key.clone(), link.to_owned())) {
                        warn!(
                            error_range = %range_key,
                            linked_to = %link,
                            "error range links to an unknown series and is omitted from tooltips"
                        );
                    }
                    None
                }
                None => preceding.clone(),
            };
            if let Some(target) = target {
                self.by_target.entry(target).or_default().push(range_key);
            }
        }
    }

    fn ranges_for(&self, series_key: &str) -> &[String] {
        self.by_target.get(series_key).map_or(&[], Vec::as_slice)
    }
}

/// Error bar attached to one tooltip row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipErrorRange {
    pub series_id: String,
    pub series_name: String,
    pub range: ValueRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub series_id: String,
    pub series_name: String,
    pub point_id: String,
    pub x: f64,
    pub y: f64,
    pub error_ranges: Vec<TooltipErrorRange>,
}

/// Rows shown by the host tooltip view for the current target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub x: f64,
    pub items: Vec<TooltipItem>,
}

fn error_ranges_at(scene: &Scene, links: &ErrorRangeLinks, point: &PointRef) -> Vec<TooltipErrorRange> {
    links
        .ranges_for(&point.key.series)
        .iter()
        .filter_map(|range_key| {
            let series = scene.series_by_key(range_key).filter(|series| series.visible)?;
            let range = series
                .points
                .iter()
                .find(|node| node.visible && node.x == point.x)
                .and_then(|node| node.range)?;
            Some(TooltipErrorRange {
                series_id: range_key.clone(),
                series_name: series.name.clone(),
                range,
            })
        })
        .collect()
}

fn tooltip_item(scene: &Scene, links: &ErrorRangeLinks, point: &PointRef) -> TooltipItem {
    TooltipItem {
        series_id: point.key.series.clone(),
        series_name: point.series_name.clone(),
        point_id: point.key.point.clone(),
        x: point.x,
        y: point.y,
        error_ranges: error_ranges_at(scene, links, point),
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Content for the visible tooltip: every point of the target group, or
    /// the single segment of a pie-like target. `None` while hidden.
    pub fn tooltip_content(&mut self) -> ChartResult<Option<TooltipContent>> {
        self.scene_cache("tooltip_content")?;
        if self.drop_stale_tooltip() || !self.tooltip.visible {
            return Ok(None);
        }
        let Some(group) = self.tooltip.group.as_ref() else {
            return Ok(None);
        };
        let scene = self.engine.scene();
        let items = match &self.tooltip.point {
            Some(point) if point.series_kind.is_single_value_per_position() => {
                vec![tooltip_item(scene, &self.links, point)]
            }
            _ => group
                .points
                .iter()
                .map(|point| tooltip_item(scene, &self.links, point))
                .collect(),
        };
        Ok(Some(TooltipContent {
            x: group.x,
            items,
        }))
    }
}
