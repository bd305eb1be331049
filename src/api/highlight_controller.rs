use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace, warn};

use crate::core::{
    ElementHandle, EmphasisState, PointHandle, PointKey, Scene, SeriesHandle, SeriesKind,
};
use crate::error::ChartResult;
use crate::render::{EmphasisGate, RenderingEngine};

use super::InteractionCoordinator;

/// Emphasis recorded by stable id so it survives engine re-creation of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct HighlightStore {
    series: IndexMap<String, EmphasisState>,
    points: IndexMap<PointKey, EmphasisState>,
    reference_lines: IndexMap<String, EmphasisState>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EmphasisTarget {
    Series(SeriesHandle),
    Point(PointHandle),
    ReferenceLine(ElementHandle),
}

fn apply_authorized<E: RenderingEngine>(
    engine: &mut E,
    gate: &EmphasisGate,
    changes: &[(EmphasisTarget, EmphasisState)],
) {
    gate.authorize(|| {
        for (target, state) in changes {
            match *target {
                EmphasisTarget::Series(handle) => engine.set_series_emphasis(handle, *state),
                EmphasisTarget::Point(handle) => engine.set_point_emphasis(handle, *state),
                EmphasisTarget::ReferenceLine(handle) => {
                    engine.set_reference_line_emphasis(handle, *state)
                }
            }
        }
    });
}

fn state_for(listed: bool) -> EmphasisState {
    if listed {
        EmphasisState::Normal
    } else {
        EmphasisState::Inactive
    }
}

impl HighlightStore {
    /// Drops recorded state for series, points and lines the scene no longer has.
    fn prune(&mut self, scene: &Scene) {
        let mut live_series = IndexSet::new();
        let mut live_points = IndexSet::new();
        for series in &scene.series {
            let key = series.key();
            for point in &series.points {
                live_points.insert(PointKey::new(key.clone(), point.key()));
            }
            live_series.insert(key);
        }
        let live_lines: IndexSet<&str> = scene
            .reference_lines
            .iter()
            .filter_map(|line| line.id.as_deref())
            .collect();

        let before = self.series.len() + self.points.len() + self.reference_lines.len();
        self.series.retain(|key, _| live_series.contains(key));
        self.points.retain(|key, _| live_points.contains(key));
        self.reference_lines
            .retain(|id, _| live_lines.contains(id.as_str()));
        let pruned = before - (self.series.len() + self.points.len() + self.reference_lines.len());
        if pruned > 0 {
            trace!(pruned, "dropped emphasis for vanished items");
        }
    }

    /// Computes the full-scene change set for `ids` and records it.
    fn plan_items(&mut self, scene: &Scene, ids: &[&str]) -> Vec<(EmphasisTarget, EmphasisState)> {
        self.prune(scene);
        let mut changes = Vec::new();
        for series in &scene.series {
            let key = series.key();
            if series.kind.is_single_value_per_position() {
                self.series.insert(key.clone(), EmphasisState::Normal);
                changes.push((EmphasisTarget::Series(series.handle), EmphasisState::Normal));
                for point in &series.points {
                    let point_key = point.key();
                    let state = state_for(ids.contains(&point_key.as_str()));
                    self.points.insert(PointKey::new(key.clone(), point_key), state);
                    changes.push((EmphasisTarget::Point(point.handle), state));
                }
                continue;
            }
            let linked_listed = series.kind == SeriesKind::ErrorRange
                && series
                    .linked_to
                    .as_deref()
                    .is_some_and(|linked| ids.contains(&linked));
            let state = state_for(ids.contains(&key.as_str()) || linked_listed);
            self.series.insert(key, state);
            changes.push((EmphasisTarget::Series(series.handle), state));
        }
        changes.extend(self.plan_reference_lines(scene, |id| state_for(ids.contains(&id))));
        changes
    }

    fn plan_clear(&mut self, scene: &Scene) -> Vec<(EmphasisTarget, EmphasisState)> {
        self.prune(scene);
        let mut changes = Vec::new();
        for series in &scene.series {
            let key = series.key();
            self.series.insert(key.clone(), EmphasisState::Normal);
            changes.push((EmphasisTarget::Series(series.handle), EmphasisState::Normal));
            for point in &series.points {
                let point_key = PointKey::new(key.clone(), point.key());
                let tracked = self.points.contains_key(&point_key);
                if tracked || series.kind.is_single_value_per_position() {
                    self.points.insert(point_key, EmphasisState::Normal);
                    changes.push((EmphasisTarget::Point(point.handle), EmphasisState::Normal));
                }
            }
        }
        changes.extend(self.plan_reference_lines(scene, |_| EmphasisState::Normal));
        changes
    }

    /// Lines without an id are decorative and never touched.
    fn plan_reference_lines(
        &mut self,
        scene: &Scene,
        state_of: impl Fn(&str) -> EmphasisState,
    ) -> Vec<(EmphasisTarget, EmphasisState)> {
        scene
            .reference_lines
            .iter()
            .filter_map(|line| {
                let id = line.id.as_deref()?;
                let state = state_of(id);
                self.reference_lines.insert(id.to_owned(), state);
                Some((EmphasisTarget::ReferenceLine(line.handle), state))
            })
            .collect()
    }

    /// Re-issues every recorded state onto the objects of the current scene.
    fn plan_restore(&self, scene: &Scene) -> Vec<(EmphasisTarget, EmphasisState)> {
        let mut changes = Vec::new();
        for series in &scene.series {
            let key = series.key();
            if let Some(state) = self.series.get(&key) {
                changes.push((EmphasisTarget::Series(series.handle), *state));
            }
            for point in &series.points {
                if let Some(state) = self.points.get(&PointKey::new(key.clone(), point.key())) {
                    changes.push((EmphasisTarget::Point(point.handle), *state));
                }
            }
        }
        for line in &scene.reference_lines {
            let Some(id) = line.id.as_deref() else {
                continue;
            };
            if let Some(state) = self.reference_lines.get(id) {
                changes.push((EmphasisTarget::ReferenceLine(line.handle), *state));
            }
        }
        changes
    }
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Applies emphasis to one live series and records it by series key.
    pub fn set_series_state(&mut self, series: SeriesHandle, state: EmphasisState) -> ChartResult<()> {
        self.scene_cache("set_series_state")?;
        let Some(node) = self.engine.scene().series_by_handle(series) else {
            warn!(?series, "ignoring emphasis for destroyed series handle");
            return Ok(());
        };
        self.highlight.series.insert(node.key(), state);
        apply_authorized(
            &mut self.engine,
            &self.gate,
            &[(EmphasisTarget::Series(series), state)],
        );
        Ok(())
    }

    /// Applies emphasis to one live point and records it by point key.
    pub fn set_point_state(&mut self, point: PointHandle, state: EmphasisState) -> ChartResult<()> {
        self.scene_cache("set_point_state")?;
        let Some((series, node)) = self.engine.scene().point(point) else {
            warn!(?point, "ignoring emphasis for destroyed point handle");
            return Ok(());
        };
        let key = PointKey::new(series.key(), node.key());
        self.highlight.points.insert(key, state);
        apply_authorized(
            &mut self.engine,
            &self.gate,
            &[(EmphasisTarget::Point(point), state)],
        );
        Ok(())
    }

    /// Keeps `ids` at normal emphasis and dims every other identifiable item.
    pub fn highlight_items<S: AsRef<str>>(&mut self, ids: &[S]) -> ChartResult<()> {
        self.scene_cache("highlight_items")?;
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        self.apply_highlight_ids(&ids);
        Ok(())
    }

    /// Returns every identifiable item to normal emphasis.
    pub fn clear_highlight(&mut self) -> ChartResult<()> {
        self.scene_cache("clear_highlight")?;
        self.apply_clear_highlight();
        Ok(())
    }

    /// Recorded emphasis for a series key; `Normal` when never set.
    #[must_use]
    pub fn series_state(&self, series_key: &str) -> EmphasisState {
        self.highlight
            .series
            .get(series_key)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn point_state(&self, key: &PointKey) -> EmphasisState {
        self.highlight.points.get(key).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn reference_line_state(&self, id: &str) -> EmphasisState {
        self.highlight
            .reference_lines
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    pub(super) fn apply_highlight_ids(&mut self, ids: &[&str]) {
        let changes = self.highlight.plan_items(self.engine.scene(), ids);
        debug!(ids = ?ids, changes = changes.len(), "highlight items");
        apply_authorized(&mut self.engine, &self.gate, &changes);
    }

    pub(super) fn apply_clear_highlight(&mut self) {
        let changes = self.highlight.plan_clear(self.engine.scene());
        debug!(changes = changes.len(), "clear highlight");
        apply_authorized(&mut self.engine, &self.gate, &changes);
    }

    pub(super) fn restore_highlight(&mut self) {
        let changes = self.highlight.plan_restore(self.engine.scene());
        apply_authorized(&mut self.engine, &self.gate, &changes);
    }
}

#[cfg(test)]
mod tests {
    use super::HighlightStore;
    use crate::core::{PointKey, Rect, SeriesKind};
    use crate::render::{MemoryEngine, MemoryPoint, MemorySeries};

    fn pie_engine(segments: &[&str]) -> MemoryEngine {
        let mut series = MemorySeries::new(SeriesKind::Pie, "share");
        for (index, name) in segments.iter().enumerate() {
            series = series.with_point(MemoryPoint::new(index as f64, Some(1.0)).with_name(*name));
        }
        MemoryEngine::new(
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Rect::new(40.0, 20.0, 320.0, 240.0),
        )
        .with_series(series)
        .with_reference_line(Some("target"))
    }

    #[test]
    fn replaced_segments_are_evicted_on_next_plan() {
        let mut store = HighlightStore::default();
        let mut engine = pie_engine(&["north", "south"]);
        store.plan_items(engine.redraw(), &["north", "target"]);
        assert_eq!(store.points.len(), 2);
        assert_eq!(store.reference_lines.len(), 1);

        let mut engine = pie_engine(&["east"]).with_series(
            MemorySeries::new(SeriesKind::Line, "A").with_values([(0.0, Some(1.0))]),
        );
        store.plan_clear(engine.redraw());

        let keys: Vec<&PointKey> = store.points.keys().collect();
        assert_eq!(keys, vec![&PointKey::new("share", "east")]);
        assert!(store.series.contains_key("share"));
        assert!(store.series.contains_key("A"));
        assert_eq!(store.reference_lines.len(), 1);
    }

    #[test]
    fn removed_series_are_evicted() {
        let mut store = HighlightStore::default();
        let mut engine = pie_engine(&["north"]).with_series(
            MemorySeries::new(SeriesKind::Line, "A").with_values([(0.0, Some(1.0))]),
        );
        store.plan_items(engine.redraw(), &["A"]);
        assert!(store.series.contains_key("A"));

        assert!(engine.remove_series("A"));
        store.plan_items(engine.redraw(), &["north"]);
        assert!(!store.series.contains_key("A"));
    }
}
