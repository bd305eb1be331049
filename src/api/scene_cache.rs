use std::collections::BTreeMap;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{
    Group, PlotArea, PointHandle, PointKey, PointRef, Rect, Scene, ScreenPoint, distance_to_band,
};

/// Position-indexed view of the visible scene, rebuilt from scratch on every render.
///
/// Only visible, non-null points of visible navigable series are cached.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCache {
    generation: u64,
    plot_area: PlotArea,
    surface: Rect,
    single_value_chart: bool,
    column_targets: bool,
    all_positions: Vec<f64>,
    series_positions: IndexMap<String, Vec<f64>>,
    groups: BTreeMap<OrderedFloat<f64>, Group>,
    points_by_key: IndexMap<PointKey, (OrderedFloat<f64>, usize)>,
    keys_by_handle: IndexMap<PointHandle, PointKey>,
}

/// Sort key placing points in visual top-to-bottom order at one position.
///
/// Ungrouped columns keep declaration order and sort ahead of the rest;
/// everything else orders by its value-axis coordinate measured as if the
/// axis were not reversed.
type OrderKey = (u8, OrderedFloat<f64>, usize, u32);

impl SceneCache {
    #[must_use]
    pub fn rebuild(scene: &Scene) -> Self {
        let plot_area = scene.plot_area;
        let reversed = scene.value_axis_reversed;
        let mut buckets: BTreeMap<OrderedFloat<f64>, Vec<(OrderKey, PointRef)>> = BTreeMap::new();
        let mut series_positions: IndexMap<String, Vec<f64>> = IndexMap::new();

        for (series_index, series) in scene.series.iter().enumerate() {
            if !series.visible || !series.kind.is_navigable() {
                continue;
            }
            let series_key = series.key();
            let keeps_declaration_order = series.kind.is_column() && !series.stacked;
            let mut positions: SmallVec<[f64; 16]> = SmallVec::new();

            for point in &series.points {
                let Some(y) = point.y else {
                    continue;
                };
                if !point.visible || !point.x.is_finite() || !y.is_finite() {
                    continue;
                }
                positions.push(point.x);

                let order_key = if keeps_declaration_order {
                    (0, OrderedFloat(series_index as f64), series_index, point.handle.index)
                } else {
                    let coordinate = value_axis_coordinate(plot_area, reversed, point.plot);
                    (1, OrderedFloat(coordinate), series_index, point.handle.index)
                };
                let point_ref = PointRef {
                    key: PointKey::new(series_key.clone(), point.key()),
                    handle: point.handle,
                    series_name: series.name.clone(),
                    series_kind: series.kind,
                    series_index,
                    x: point.x,
                    y,
                    plot: point.plot,
                };
                buckets
                    .entry(OrderedFloat(point.x))
                    .or_default()
                    .push((order_key, point_ref));
            }

            positions.sort_by_key(|x| OrderedFloat(*x));
            positions.dedup();
            series_positions.insert(series_key, positions.into_vec());
        }

        let mut groups = BTreeMap::new();
        let mut points_by_key = IndexMap::new();
        let mut keys_by_handle = IndexMap::new();
        for (x, mut entries) in buckets {
            entries.sort_by_key(|(order_key, _)| *order_key);
            let mut points: Vec<PointRef> = entries.into_iter().map(|(_, point)| point).collect();
            if reversed {
                points.reverse();
            }
            for (index, point) in points.iter().enumerate() {
                points_by_key.insert(point.key.clone(), (x, index));
                keys_by_handle.insert(point.handle, point.key.clone());
            }
            let Some(rect) = Rect::enclosing(points.iter().map(|point| point.plot)) else {
                continue;
            };
            groups.insert(x, Group { x: x.0, points, rect });
        }

        let all_positions: Vec<f64> = groups.keys().map(|x| x.0).collect();
        trace!(
            generation = scene.generation,
            positions = all_positions.len(),
            series = series_positions.len(),
            "scene cache rebuilt"
        );

        Self {
            generation: scene.generation,
            plot_area,
            surface: scene.surface,
            single_value_chart: scene.is_single_value_chart(),
            column_targets: scene.has_column_targets(),
            all_positions,
            series_positions,
            groups,
            points_by_key,
            keys_by_handle,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot_area
    }

    #[must_use]
    pub fn surface(&self) -> Rect {
        self.surface
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.plot_area.inverted
    }

    #[must_use]
    pub fn is_single_value_chart(&self) -> bool {
        self.single_value_chart
    }

    #[must_use]
    pub fn has_column_targets(&self) -> bool {
        self.column_targets
    }

    /// Ascending distinct positions across all cached points.
    #[must_use]
    pub fn all_positions(&self) -> &[f64] {
        &self.all_positions
    }

    /// Ascending distinct positions of one series; empty for unknown keys.
    #[must_use]
    pub fn positions_in_series(&self, series_key: &str) -> &[f64] {
        self.series_positions
            .get(series_key)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn points_at_position(&self, x: f64) -> &[PointRef] {
        self.group(x).map_or(&[], |group| group.points.as_slice())
    }

    #[must_use]
    pub fn group_rect(&self, x: f64) -> Option<Rect> {
        self.group(x).map(|group| group.rect)
    }

    #[must_use]
    pub fn group(&self, x: f64) -> Option<&Group> {
        self.groups.get(&OrderedFloat(x))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    #[must_use]
    pub fn position_index(&self, x: f64) -> Option<usize> {
        self.all_positions
            .binary_search_by_key(&OrderedFloat(x), |position| OrderedFloat(*position))
            .ok()
    }

    #[must_use]
    pub fn point(&self, key: &PointKey) -> Option<&PointRef> {
        let (x, index) = self.points_by_key.get(key)?;
        self.groups.get(x)?.points.get(*index)
    }

    #[must_use]
    pub fn point_by_handle(&self, handle: PointHandle) -> Option<&PointRef> {
        self.point(self.keys_by_handle.get(&handle)?)
    }

    /// First cached point of `series_key` at position `x`.
    #[must_use]
    pub fn point_in_series_at(&self, series_key: &str, x: f64) -> Option<&PointRef> {
        self.points_at_position(x)
            .iter()
            .find(|point| point.key.series == series_key)
    }

    /// Group whose position band contains the pointer, else the nearest one.
    #[must_use]
    pub fn nearest_group(&self, position: ScreenPoint) -> Option<&Group> {
        let inverted = self.plot_area.inverted;
        let mut best: Option<(f64, &Group)> = None;
        for group in self.groups.values() {
            let distance = if inverted {
                distance_to_band(position.y, group.rect.top(), group.rect.bottom())
            } else {
                distance_to_band(position.x, group.rect.left(), group.rect.right())
            };
            if distance == 0.0 {
                return Some(group);
            }
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, group));
            }
        }
        best.map(|(_, group)| group)
    }

    /// Index into `all_positions` closest to `x`.
    #[must_use]
    pub fn nearest_position_index(&self, x: f64) -> Option<usize> {
        self.all_positions
            .iter()
            .enumerate()
            .min_by_key(|(_, position)| OrderedFloat((*position - x).abs()))
            .map(|(index, _)| index)
    }
}

fn value_axis_coordinate(plot_area: PlotArea, reversed: bool, plot: ScreenPoint) -> f64 {
    let rect = plot_area.rect;
    match (plot_area.inverted, reversed) {
        (false, false) => plot.y,
        (false, true) => rect.top() + rect.bottom() - plot.y,
        (true, false) => plot.x,
        (true, true) => rect.left() + rect.right() - plot.x,
    }
}

#[cfg(test)]
mod tests {
    use super::SceneCache;
    use crate::core::{PointKey, Rect, SeriesKind};
    use crate::render::{MemoryEngine, MemorySeries};

    fn engine() -> MemoryEngine {
        MemoryEngine::new(
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Rect::new(40.0, 20.0, 320.0, 240.0),
        )
    }

    #[test]
    fn empty_scene_yields_empty_collections() {
        let mut engine = engine();
        let cache = SceneCache::rebuild(engine.redraw());
        assert!(cache.all_positions().is_empty());
        assert!(cache.points_at_position(0.0).is_empty());
        assert!(cache.group_rect(0.0).is_none());
        assert!(cache.positions_in_series("missing").is_empty());
    }

    #[test]
    fn hidden_series_and_error_ranges_are_not_cached() {
        let mut engine = engine()
            .with_series(
                MemorySeries::new(SeriesKind::Line, "A").with_values([(0.0, Some(1.0))]),
            )
            .with_series(
                MemorySeries::new(SeriesKind::Line, "B")
                    .with_visibility(false)
                    .with_values([(5.0, Some(1.0))]),
            )
            .with_series(
                MemorySeries::new(SeriesKind::ErrorRange, "E")
                    .linked_to("A")
                    .with_values([(7.0, Some(1.0))]),
            );
        let cache = SceneCache::rebuild(engine.redraw());
        assert_eq!(cache.all_positions(), &[0.0]);
        assert!(cache.positions_in_series("B").is_empty());
        assert!(cache.positions_in_series("E").is_empty());
    }

    #[test]
    fn lookup_by_key_and_handle_agree() {
        let mut engine = engine().with_series(
            MemorySeries::new(SeriesKind::Line, "A").with_values([(0.0, Some(1.0)), (1.0, Some(2.0))]),
        );
        let cache = SceneCache::rebuild(engine.redraw());
        let key = PointKey::new("A", "1:2");
        let by_key = cache.point(&key).expect("point by key");
        let by_handle = cache.point_by_handle(by_key.handle).expect("point by handle");
        assert_eq!(by_key, by_handle);
        assert_eq!(cache.position_index(1.0), Some(1));
        assert_eq!(cache.nearest_position_index(0.4), Some(0));
    }
}
