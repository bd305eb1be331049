use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{
    ElementHandle, EmphasisState, PlotArea, PointHandle, PointKey, PointNode, Rect,
    ReferenceLineNode, Scene, ScreenPoint, SeriesHandle, SeriesKind, SeriesNode, ValueRange,
    point_key, series_key,
};
use crate::error::ChartResult;

use super::{EmphasisGate, RenderingEngine, ShapeHandle, ShapePrimitive};

/// Data point definition fed to the headless engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPoint {
    pub id: Option<String>,
    pub name: Option<String>,
    pub x: f64,
    pub y: Option<f64>,
    pub range: Option<ValueRange>,
    pub visible: bool,
}

impl MemoryPoint {
    #[must_use]
    pub fn new(x: f64, y: Option<f64>) -> Self {
        Self {
            id: None,
            name: None,
            x,
            y,
            range: None,
            visible: true,
        }
    }

    /// Error-range point spanning `low..=high`.
    #[must_use]
    pub fn range(x: f64, low: f64, high: f64) -> Self {
        let range = ValueRange::new(low, high);
        Self {
            range: Some(range),
            ..Self::new(x, Some((range.low + range.high) / 2.0))
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn key(&self) -> String {
        point_key(self.id.as_deref(), self.name.as_deref(), self.x, self.y)
    }
}

/// Series definition fed to the headless engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySeries {
    pub id: Option<String>,
    pub name: String,
    pub kind: SeriesKind,
    pub visible: bool,
    pub stacked: bool,
    pub color: Option<String>,
    pub linked_to: Option<String>,
    pub points: Vec<MemoryPoint>,
}

impl MemorySeries {
    #[must_use]
    pub fn new(kind: SeriesKind, name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            visible: true,
            stacked: false,
            color: None,
            linked_to: None,
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_stacking(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    #[must_use]
    pub fn linked_to(mut self, series: impl Into<String>) -> Self {
        self.linked_to = Some(series.into());
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = (f64, Option<f64>)>) -> Self {
        self.points
            .extend(values.into_iter().map(|(x, y)| MemoryPoint::new(x, y)));
        self
    }

    #[must_use]
    pub fn with_point(mut self, point: MemoryPoint) -> Self {
        self.points.push(point);
        self
    }

    fn key(&self) -> String {
        series_key(self.id.as_deref(), &self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Domain {
    min: f64,
    max: f64,
}

impl Domain {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        if (max - min).abs() <= f64::EPSILON {
            return Self {
                min: min - 0.5,
                max: max + 0.5,
            };
        }
        Self { min, max }
    }

    fn ratio(self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// Headless engine that owns a scene graph in memory.
///
/// It behaves like a retained-mode engine: every `redraw` destroys and
/// re-issues all handles, fresh objects start with `Normal` emphasis, and a
/// native hover behavior competes with the coordinator unless a gate blocks it.
#[derive(Debug)]
pub struct MemoryEngine {
    surface: Rect,
    plot_rect: Rect,
    inverted: bool,
    value_axis_reversed: bool,
    series: Vec<MemorySeries>,
    reference_lines: Vec<Option<String>>,
    scene: Scene,
    gate: Option<EmphasisGate>,
    gate_installs: usize,
    suppressed_emphasis_calls: usize,
    series_emphasis: Vec<EmphasisState>,
    point_emphasis: Vec<Vec<EmphasisState>>,
    line_emphasis: Vec<EmphasisState>,
    shapes: IndexMap<ShapeHandle, ShapePrimitive>,
    next_shape: u64,
}

impl MemoryEngine {
    #[must_use]
    pub fn new(surface: Rect, plot_rect: Rect) -> Self {
        Self {
            surface,
            plot_rect,
            inverted: false,
            value_axis_reversed: false,
            series: Vec::new(),
            reference_lines: Vec::new(),
            scene: Scene {
                generation: 0,
                surface,
                plot_area: PlotArea {
                    rect: plot_rect,
                    inverted: false,
                },
                value_axis_reversed: false,
                series: Vec::new(),
                reference_lines: Vec::new(),
            },
            gate: None,
            gate_installs: 0,
            suppressed_emphasis_calls: 0,
            series_emphasis: Vec::new(),
            point_emphasis: Vec::new(),
            line_emphasis: Vec::new(),
            shapes: IndexMap::new(),
            next_shape: 1,
        }
    }

    #[must_use]
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[must_use]
    pub fn with_value_axis_reversed(mut self, reversed: bool) -> Self {
        self.value_axis_reversed = reversed;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: MemorySeries) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_reference_line(mut self, id: Option<&str>) -> Self {
        self.reference_lines.push(id.map(str::to_owned));
        self
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn set_value_axis_reversed(&mut self, reversed: bool) {
        self.value_axis_reversed = reversed;
    }

    pub fn push_series(&mut self, series: MemorySeries) {
        self.series.push(series);
    }

    /// Removes a series from the model. Returns `true` when it existed.
    pub fn remove_series(&mut self, key: &str) -> bool {
        let before = self.series.len();
        self.series.retain(|series| series.key() != key);
        before != self.series.len()
    }

    /// Replaces the points of one series. Returns `false` for an unknown key.
    pub fn replace_points(&mut self, key: &str, points: Vec<MemoryPoint>) -> bool {
        match self.series.iter_mut().find(|series| series.key() == key) {
            Some(series) => {
                series.points = points;
                true
            }
            None => false,
        }
    }

    /// Destroys every scene object and re-issues the scene with a new generation.
    pub fn redraw(&mut self) -> &Scene {
        let generation = self.scene.generation + 1;
        let (x_domain, y_domain) = self.domains();
        let plot_area = PlotArea {
            rect: self.plot_rect,
            inverted: self.inverted,
        };

        let mut series_nodes = Vec::with_capacity(self.series.len());
        for (series_index, series) in self.series.iter().enumerate() {
            let handle = SeriesHandle {
                generation,
                index: series_index as u32,
            };
            let radial = series.kind.is_single_value_per_position();
            let radial_total: f64 = series
                .points
                .iter()
                .filter(|point| point.visible)
                .filter_map(|point| point.y)
                .map(f64::abs)
                .sum();
            let mut radial_offset = 0.0;

            let points = series
                .points
                .iter()
                .enumerate()
                .map(|(point_index, point)| {
                    let plot = if radial {
                        let share = match (point.visible, point.y) {
                            (true, Some(y)) if radial_total > 0.0 => y.abs() / radial_total,
                            _ => 0.0,
                        };
                        let centroid = self.radial_centroid(radial_offset, share);
                        radial_offset += share;
                        centroid
                    } else {
                        self.project(x_domain, y_domain, point.x, point.y.unwrap_or(y_domain.min))
                    };
                    PointNode {
                        handle: PointHandle {
                            generation,
                            series: series_index as u32,
                            index: point_index as u32,
                        },
                        id: point.id.clone(),
                        name: point.name.clone(),
                        x: point.x,
                        y: point.y,
                        range: point.range,
                        visible: point.visible,
                        plot,
                    }
                })
                .collect();

            series_nodes.push(SeriesNode {
                handle,
                id: series.id.clone(),
                name: series.name.clone(),
                kind: series.kind,
                visible: series.visible,
                stacked: series.stacked,
                color: series.color.clone(),
                linked_to: series.linked_to.clone(),
                points,
            });
        }

        let reference_lines = self
            .reference_lines
            .iter()
            .enumerate()
            .map(|(index, id)| ReferenceLineNode {
                handle: ElementHandle {
                    generation,
                    index: index as u32,
                },
                id: id.clone(),
            })
            .collect();

        self.series_emphasis = vec![EmphasisState::Normal; self.series.len()];
        self.point_emphasis = self
            .series
            .iter()
            .map(|series| vec![EmphasisState::Normal; series.points.len()])
            .collect();
        self.line_emphasis = vec![EmphasisState::Normal; self.reference_lines.len()];

        self.scene = Scene {
            generation,
            surface: self.surface,
            plot_area,
            value_axis_reversed: self.value_axis_reversed,
            series: series_nodes,
            reference_lines,
        };
        debug!(generation, series = self.series.len(), "memory engine redraw");
        &self.scene
    }

    /// Engine's own hover emphasis: dims every series except the hovered one.
    ///
    /// Returns `true` when the change was applied, `false` when the gate blocked it.
    pub fn simulate_native_hover(&mut self, point: PointHandle) -> bool {
        if self.scene.point(point).is_none() {
            return false;
        }
        let mut applied = false;
        for index in 0..self.series_emphasis.len() {
            let state = if index as u32 == point.series {
                EmphasisState::Normal
            } else {
                EmphasisState::Inactive
            };
            applied |= self.apply_series_emphasis(index, state);
        }
        applied
    }

    #[must_use]
    pub fn series_emphasis(&self, key: &str) -> Option<EmphasisState> {
        let index = self.series.iter().position(|series| series.key() == key)?;
        self.series_emphasis.get(index).copied()
    }

    #[must_use]
    pub fn point_emphasis(&self, key: &PointKey) -> Option<EmphasisState> {
        let series_index = self
            .series
            .iter()
            .position(|series| series.key() == key.series)?;
        let point_index = self.series[series_index]
            .points
            .iter()
            .position(|point| point.key() == key.point)?;
        self.point_emphasis
            .get(series_index)
            .and_then(|points| points.get(point_index))
            .copied()
    }

    #[must_use]
    pub fn reference_line_emphasis(&self, index: usize) -> Option<EmphasisState> {
        self.line_emphasis.get(index).copied()
    }

    #[must_use]
    pub fn series_visible(&self, key: &str) -> Option<bool> {
        self.series
            .iter()
            .find(|series| series.key() == key)
            .map(|series| series.visible)
    }

    #[must_use]
    pub fn point_visible(&self, key: &PointKey) -> Option<bool> {
        self.series
            .iter()
            .find(|series| series.key() == key.series)?
            .points
            .iter()
            .find(|point| point.key() == key.point)
            .map(|point| point.visible)
    }

    #[must_use]
    pub fn shapes(&self) -> &IndexMap<ShapeHandle, ShapePrimitive> {
        &self.shapes
    }

    #[must_use]
    pub fn gate_installs(&self) -> usize {
        self.gate_installs
    }

    #[must_use]
    pub fn suppressed_emphasis_calls(&self) -> usize {
        self.suppressed_emphasis_calls
    }

    fn permits_emphasis(&mut self) -> bool {
        match &self.gate {
            Some(gate) if !gate.is_authorized() => {
                self.suppressed_emphasis_calls += 1;
                trace!("memory engine dropped unauthorized emphasis change");
                false
            }
            _ => true,
        }
    }

    fn apply_series_emphasis(&mut self, index: usize, state: EmphasisState) -> bool {
        if !self.permits_emphasis() {
            return false;
        }
        match self.series_emphasis.get_mut(index) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    fn domains(&self) -> (Domain, Domain) {
        let cartesian = || {
            self.series
                .iter()
                .filter(|series| !series.kind.is_single_value_per_position())
                .flat_map(|series| series.points.iter())
        };
        let x_domain = Domain::from_values(cartesian().map(|point| point.x));
        let y_domain = Domain::from_values(
            cartesian()
                .filter_map(|point| point.y)
                .chain(cartesian().filter_map(|point| point.range.map(|range| range.low)))
                .chain(std::iter::once(0.0)),
        );
        (x_domain, y_domain)
    }

    fn project(&self, x_domain: Domain, y_domain: Domain, x: f64, y: f64) -> ScreenPoint {
        let tx = x_domain.ratio(x);
        let mut ty = y_domain.ratio(y);
        if self.value_axis_reversed {
            ty = 1.0 - ty;
        }
        let rect = self.plot_rect;
        if self.inverted {
            ScreenPoint::new(rect.left() + ty * rect.width, rect.top() + tx * rect.height)
        } else {
            ScreenPoint::new(
                rect.left() + tx * rect.width,
                rect.top() + (1.0 - ty) * rect.height,
            )
        }
    }

    fn radial_centroid(&self, start_share: f64, share: f64) -> ScreenPoint {
        let center = self.plot_rect.center();
        let radius = self.plot_rect.width.min(self.plot_rect.height) / 2.0;
        let angle = (start_share + share / 2.0) * std::f64::consts::TAU;
        ScreenPoint::new(
            center.x + angle.sin() * radius / 2.0,
            center.y - angle.cos() * radius / 2.0,
        )
    }

    fn model_point_mut(&mut self, handle: PointHandle) -> Option<&mut MemoryPoint> {
        if self.scene.is_destroyed(handle) {
            return None;
        }
        self.series
            .get_mut(handle.series as usize)?
            .points
            .get_mut(handle.index as usize)
    }
}

impl RenderingEngine for MemoryEngine {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn install_emphasis_gate(&mut self, gate: EmphasisGate) {
        let already_installed = self
            .gate
            .as_ref()
            .is_some_and(|installed| installed.shares_flag_with(&gate));
        if !already_installed {
            self.gate_installs += 1;
            self.gate = Some(gate);
        }
    }

    fn set_series_emphasis(&mut self, series: SeriesHandle, state: EmphasisState) {
        if series.generation != self.scene.generation {
            return;
        }
        self.apply_series_emphasis(series.index as usize, state);
    }

    fn set_point_emphasis(&mut self, point: PointHandle, state: EmphasisState) {
        if self.scene.is_destroyed(point) || !self.permits_emphasis() {
            return;
        }
        if let Some(slot) = self
            .point_emphasis
            .get_mut(point.series as usize)
            .and_then(|points| points.get_mut(point.index as usize))
        {
            *slot = state;
        }
    }

    fn set_reference_line_emphasis(&mut self, line: ElementHandle, state: EmphasisState) {
        if line.generation != self.scene.generation || !self.permits_emphasis() {
            return;
        }
        if let Some(slot) = self.line_emphasis.get_mut(line.index as usize) {
            *slot = state;
        }
    }

    fn set_series_visible(&mut self, series: SeriesHandle, visible: bool) {
        if series.generation != self.scene.generation {
            return;
        }
        if let Some(model) = self.series.get_mut(series.index as usize) {
            model.visible = visible;
        }
    }

    fn set_point_visible(&mut self, point: PointHandle, visible: bool) {
        if let Some(model) = self.model_point_mut(point) {
            model.visible = visible;
        }
    }

    fn draw(&mut self, primitive: ShapePrimitive) -> ChartResult<ShapeHandle> {
        primitive.validate()?;
        let handle = ShapeHandle::new(self.next_shape);
        self.next_shape += 1;
        self.shapes.insert(handle, primitive);
        Ok(handle)
    }

    fn destroy_shape(&mut self, handle: ShapeHandle) {
        self.shapes.shift_remove(&handle);
    }

    fn exact_point_anchor(&self, point: PointHandle) -> Option<Rect> {
        let (series, node) = self.scene.point(point)?;
        series
            .kind
            .is_single_value_per_position()
            .then(|| Rect::at_point(node.plot))
    }
}
