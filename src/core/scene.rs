use serde::{Deserialize, Serialize};

use super::geometry::{Rect, ScreenPoint};
use super::types::{PointKey, SeriesKind, ValueRange, point_key, series_key};

/// Engine handle to a series. Valid only for the render generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesHandle {
    pub generation: u64,
    pub index: u32,
}

/// Engine handle to a point. Valid only for the render generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointHandle {
    pub generation: u64,
    pub series: u32,
    pub index: u32,
}

impl PointHandle {
    #[must_use]
    pub fn series_handle(self) -> SeriesHandle {
        SeriesHandle {
            generation: self.generation,
            index: self.series,
        }
    }
}

/// Engine handle to a drawn axis element such as a reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    pub generation: u64,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointNode {
    pub handle: PointHandle,
    pub id: Option<String>,
    pub name: Option<String>,
    pub x: f64,
    pub y: Option<f64>,
    #[serde(default)]
    pub range: Option<ValueRange>,
    pub visible: bool,
    /// Plotted position in surface pixels.
    pub plot: ScreenPoint,
}

impl PointNode {
    #[must_use]
    pub fn key(&self) -> String {
        point_key(self.id.as_deref(), self.name.as_deref(), self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesNode {
    pub handle: SeriesHandle,
    pub id: Option<String>,
    pub name: String,
    pub kind: SeriesKind,
    pub visible: bool,
    #[serde(default)]
    pub stacked: bool,
    #[serde(default)]
    pub color: Option<String>,
    /// Series key an error range attaches to.
    #[serde(default)]
    pub linked_to: Option<String>,
    pub points: Vec<PointNode>,
}

impl SeriesNode {
    #[must_use]
    pub fn key(&self) -> String {
        series_key(self.id.as_deref(), &self.name)
    }
}

/// Axis-anchored line; only lines with an explicit id take part in highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLineNode {
    pub handle: ElementHandle,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub rect: Rect,
    /// Position axis runs vertically when set.
    pub inverted: bool,
}

/// Read-only snapshot of the engine scene graph for one render.
///
/// Every handle inside carries `generation`; any handle from an older
/// generation refers to an object the engine has already destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub generation: u64,
    pub surface: Rect,
    pub plot_area: PlotArea,
    pub value_axis_reversed: bool,
    pub series: Vec<SeriesNode>,
    pub reference_lines: Vec<ReferenceLineNode>,
}

impl Scene {
    #[must_use]
    pub fn is_destroyed(&self, handle: PointHandle) -> bool {
        handle.generation != self.generation
    }

    #[must_use]
    pub fn series_by_handle(&self, handle: SeriesHandle) -> Option<&SeriesNode> {
        if handle.generation != self.generation {
            return None;
        }
        self.series.get(handle.index as usize)
    }

    #[must_use]
    pub fn point(&self, handle: PointHandle) -> Option<(&SeriesNode, &PointNode)> {
        if self.is_destroyed(handle) {
            return None;
        }
        let series = self.series.get(handle.series as usize)?;
        let point = series.points.get(handle.index as usize)?;
        Some((series, point))
    }

    #[must_use]
    pub fn series_by_key(&self, key: &str) -> Option<&SeriesNode> {
        self.series.iter().find(|series| series.key() == key)
    }

    #[must_use]
    pub fn point_by_key(&self, key: &PointKey) -> Option<(&SeriesNode, &PointNode)> {
        let series = self.series_by_key(&key.series)?;
        let point = series.points.iter().find(|point| point.key() == key.point)?;
        Some((series, point))
    }

    /// Whether the chart renders one value per position (pie-like).
    #[must_use]
    pub fn is_single_value_chart(&self) -> bool {
        self.series
            .iter()
            .any(|series| series.visible && series.kind.is_single_value_per_position())
    }

    /// Whether any visible series exposes discrete column hit targets.
    #[must_use]
    pub fn has_column_targets(&self) -> bool {
        self.series
            .iter()
            .any(|series| series.visible && series.kind.is_column())
    }
}
