use tracing::{debug, trace, warn};

use crate::core::{Group, PointRef};
use crate::error::ChartResult;
use crate::extensions::CoordinatorEvent;
use crate::interaction::{AnchorRole, Announcement, FocusState, NavKey, TooltipState};
use crate::render::RenderingEngine;

use super::navigation_key_resolver::{
    NavIntent, page_size, resolve_cartesian_key, resolve_radial_key, step_circular, step_clamped,
};
use super::{InteractionCoordinator, SceneCache};

#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct NavigationState {
    pub(super) focus: FocusState,
    pub(super) root_focused: bool,
    /// Set while the host re-attaches the focus anchor; the resulting
    /// focus events are synthetic.
    pub(super) suppress_focus_in: bool,
    pub(super) anchor: Option<Announcement>,
}

enum NavOutcome {
    Move(FocusState),
    Activate,
    Ignore,
}

fn group_focus(cache: &SceneCache, index: usize) -> Option<FocusState> {
    let x = *cache.all_positions().get(index)?;
    let group = cache.group(x)?.clone();
    Some(FocusState::Group { group })
}

fn point_focus(cache: &SceneCache, point: &PointRef) -> Option<FocusState> {
    let group = cache.group(point.x)?.clone();
    Some(FocusState::Point {
        point: point.clone(),
        group,
    })
}

/// Point of `series` at `positions[index]`.
fn series_point_focus(
    cache: &SceneCache,
    series: &str,
    positions: &[f64],
    index: usize,
) -> Option<FocusState> {
    let x = *positions.get(index)?;
    let point = cache.point_in_series_at(series, x)?;
    point_focus(cache, point)
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Keyboard handler for the interactive root. Returns `true` when the key
    /// was consumed and the host should suppress its default action.
    pub fn on_key(&mut self, key: NavKey) -> ChartResult<bool> {
        self.scene_cache("on_key")?;
        if !self.config.keyboard_navigation {
            return Ok(false);
        }
        if key == NavKey::Escape && self.tooltip.pinned {
            self.dismiss_pinned_tooltip(false);
            return Ok(true);
        }
        self.drop_stale_focus();
        let cache = self.scene_cache("on_key")?;
        if cache.all_positions().is_empty() {
            return Ok(false);
        }

        let outcome = if cache.is_single_value_chart() {
            self.radial_outcome(cache, resolve_radial_key(key))
        } else {
            let intent =
                resolve_cartesian_key(key, cache.is_inverted(), self.config.writing_direction);
            self.cartesian_outcome(cache, intent)
        };
        trace!(?key, "keyboard navigation");

        match outcome {
            NavOutcome::Move(next) => {
                self.move_focus(next);
                Ok(true)
            }
            NavOutcome::Activate => {
                self.activate_focus();
                Ok(true)
            }
            NavOutcome::Ignore => Ok(false),
        }
    }

    /// Focus entered the interactive root. Restores the previous focus target
    /// unless this is the synthetic event of an anchor re-attach.
    pub fn on_focus_in(&mut self) -> ChartResult<()> {
        self.scene_cache("on_focus_in")?;
        if self.navigation.suppress_focus_in {
            trace!("synthetic focus-in suppressed");
            self.navigation.suppress_focus_in = false;
            self.timers.focus_suppression.cancel();
            return Ok(());
        }
        self.navigation.root_focused = true;
        self.revalidate_focus();
        let pointer_idle =
            self.pointer.hovered_point.is_none() && self.pointer.hovered_group.is_none();
        if pointer_idle && !self.tooltip.pinned {
            self.apply_focus_highlight();
        }
        self.draw_focus_outline();
        self.announce_focus();
        Ok(())
    }

    /// Focus left the interactive root. The focus target is kept for restoration.
    pub fn on_focus_out(&mut self) {
        if self.navigation.suppress_focus_in || !self.navigation.root_focused {
            return;
        }
        self.navigation.root_focused = false;
        self.remove_focus_outline();
        if self.pointer.hovered_point.is_none() && self.pointer.hovered_group.is_none() {
            self.settle_highlight();
        }
    }

    #[must_use]
    pub fn focus_state(&self) -> &FocusState {
        &self.navigation.focus
    }

    /// Latest announcement written onto the focus anchor.
    #[must_use]
    pub fn focus_anchor(&self) -> Option<&Announcement> {
        self.navigation.anchor.as_ref()
    }

    #[must_use]
    pub fn has_root_focus(&self) -> bool {
        self.navigation.root_focused
    }

    /// Applies highlight and tooltip for the keyboard target. Returns `false`
    /// when the root is unfocused or focus sits on the chart itself.
    pub(super) fn apply_focus_highlight(&mut self) -> bool {
        if !self.navigation.root_focused {
            return false;
        }
        match self.navigation.focus.clone() {
            FocusState::Chart => false,
            FocusState::Group { group } => {
                self.apply_group_highlight(group);
                true
            }
            FocusState::Point { point, group } => {
                self.apply_point_highlight(point, group);
                true
            }
        }
    }

    /// Re-checks the focus target against the fresh cache, falling back to
    /// the chart when it no longer exists.
    pub(super) fn revalidate_focus(&mut self) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let refreshed = match &self.navigation.focus {
            FocusState::Chart => return,
            FocusState::Group { group } => cache
                .group(group.x)
                .map(|group| FocusState::Group { group: group.clone() }),
            FocusState::Point { point, .. } => cache
                .point(&point.key)
                .and_then(|fresh| point_focus(cache, fresh)),
        };

        match refreshed {
            Some(next) => {
                let changed = !next.same_target(&self.navigation.focus);
                self.navigation.focus = next.clone();
                if changed {
                    self.emit(CoordinatorEvent::FocusChanged(next));
                }
            }
            None => {
                warn!("focused target no longer exists in the scene, focus falls back to chart");
                self.navigation.focus = FocusState::Chart;
                self.emit(CoordinatorEvent::FocusChanged(FocusState::Chart));
                self.remove_focus_outline();
                if self.navigation.root_focused {
                    self.announce_focus();
                }
            }
        }
    }

    /// Writes the current focus description onto the anchor and asks the
    /// host to re-attach it. The focus event this causes is swallowed.
    pub(super) fn announce_focus(&mut self) {
        let announcement = match &self.navigation.focus {
            FocusState::Chart => Announcement {
                role: AnchorRole::Application,
                label: self.announcer.chart_label(self.config.chart_label.as_deref()),
            },
            FocusState::Group { group } => Announcement {
                role: AnchorRole::Group,
                label: self.announcer.group_label(group),
            },
            FocusState::Point { point, group } => Announcement {
                role: AnchorRole::Button,
                label: self.announcer.point_label(point, group),
            },
        };
        debug!(label = %announcement.label, "focus announcement");
        self.navigation.anchor = Some(announcement.clone());
        self.navigation.suppress_focus_in = true;
        let now = self.clock.now_ms();
        self.timers.focus_suppression.schedule(now, 0);
        self.emit(CoordinatorEvent::AnchorUpdated(announcement));
    }

    fn drop_stale_focus(&mut self) {
        let scene = self.engine.scene();
        let stale = self.navigation.focus.group().is_some_and(|group| {
            group
                .points
                .iter()
                .any(|point| scene.is_destroyed(point.handle))
        });
        if !stale {
            return;
        }
        warn!("focus references a destroyed scene object, focus falls back to chart");
        self.navigation.focus = FocusState::Chart;
        self.emit(CoordinatorEvent::FocusChanged(FocusState::Chart));
        self.remove_focus_outline();
    }

    fn cartesian_outcome(&self, cache: &SceneCache, intent: NavIntent) -> NavOutcome {
        let positions = cache.all_positions();
        let len = positions.len();
        let page = page_size(len, self.config.page_size_ratio);

        match &self.navigation.focus {
            FocusState::Chart => {
                let index = match intent {
                    NavIntent::Escape => return NavOutcome::Ignore,
                    NavIntent::First => 0,
                    NavIntent::Last | NavIntent::AlongPrev => len - 1,
                    _ => self.hover_position_index(cache).unwrap_or(0),
                };
                group_focus(cache, index).map_or(NavOutcome::Ignore, NavOutcome::Move)
            }
            FocusState::Group { group } => {
                let Some(index) = cache.position_index(group.x) else {
                    return NavOutcome::Ignore;
                };
                let next = match intent {
                    NavIntent::AlongNext => group_focus(cache, step_circular(index, len, true)),
                    NavIntent::AlongPrev => group_focus(cache, step_circular(index, len, false)),
                    NavIntent::PageForward => {
                        group_focus(cache, step_clamped(index, len, page, true))
                    }
                    NavIntent::PageBack => group_focus(cache, step_clamped(index, len, page, false)),
                    NavIntent::First => group_focus(cache, 0),
                    NavIntent::Last => group_focus(cache, len - 1),
                    NavIntent::AcrossNext => group
                        .points
                        .first()
                        .and_then(|point| point_focus(cache, point)),
                    NavIntent::AcrossPrev => group
                        .points
                        .last()
                        .and_then(|point| point_focus(cache, point)),
                    NavIntent::Escape => Some(FocusState::Chart),
                    NavIntent::Activate => return NavOutcome::Activate,
                };
                next.map_or(NavOutcome::Ignore, NavOutcome::Move)
            }
            FocusState::Point { point, group } => {
                let series = point.key.series.as_str();
                let series_positions = cache.positions_in_series(series);
                let series_len = series_positions.len();
                let series_index = series_positions
                    .iter()
                    .position(|x| *x == point.x);
                let series_page = page_size(series_len, self.config.page_size_ratio);

                let next = match (intent, series_index) {
                    (NavIntent::Escape, _) => Some(FocusState::Group {
                        group: group.clone(),
                    }),
                    (NavIntent::Activate, _) => return NavOutcome::Activate,
                    (NavIntent::AcrossNext | NavIntent::AcrossPrev, _) => {
                        let forward = intent == NavIntent::AcrossNext;
                        group.index_of(&point.key).and_then(|index| {
                            let next = step_circular(index, group.points.len(), forward);
                            point_focus(cache, group.points.get(next)?)
                        })
                    }
                    (_, None) => None,
                    (NavIntent::AlongNext, Some(index)) => series_point_focus(
                        cache,
                        series,
                        series_positions,
                        step_circular(index, series_len, true),
                    ),
                    (NavIntent::AlongPrev, Some(index)) => series_point_focus(
                        cache,
                        series,
                        series_positions,
                        step_circular(index, series_len, false),
                    ),
                    (NavIntent::PageForward, Some(index)) => series_point_focus(
                        cache,
                        series,
                        series_positions,
                        step_clamped(index, series_len, series_page, true),
                    ),
                    (NavIntent::PageBack, Some(index)) => series_point_focus(
                        cache,
                        series,
                        series_positions,
                        step_clamped(index, series_len, series_page, false),
                    ),
                    (NavIntent::First, Some(_)) => {
                        series_point_focus(cache, series, series_positions, 0)
                    }
                    (NavIntent::Last, Some(_)) => {
                        series_point_focus(cache, series, series_positions, series_len - 1)
                    }
                };
                next.map_or(NavOutcome::Ignore, NavOutcome::Move)
            }
        }
    }

    /// Pie-like charts skip the group level: focus moves straight between
    /// segments and Escape returns to the chart.
    fn radial_outcome(&self, cache: &SceneCache, intent: NavIntent) -> NavOutcome {
        let positions = cache.all_positions();
        let len = positions.len();
        let page = page_size(len, self.config.page_size_ratio);
        let segment_at = |index: usize| {
            let x = *positions.get(index)?;
            let point = cache.points_at_position(x).first()?;
            point_focus(cache, point)
        };

        let current = self
            .navigation
            .focus
            .point()
            .and_then(|point| cache.position_index(point.x));
        let next = match (intent, current) {
            (NavIntent::Escape, None) => return NavOutcome::Ignore,
            (NavIntent::Escape, Some(_)) => Some(FocusState::Chart),
            (NavIntent::Activate, Some(_)) => return NavOutcome::Activate,
            (NavIntent::Last, _) | (NavIntent::AlongPrev, None) => segment_at(len - 1),
            (NavIntent::First, _) | (_, None) => segment_at(0),
            (NavIntent::AlongNext | NavIntent::AcrossNext, Some(index)) => {
                segment_at(step_circular(index, len, true))
            }
            (NavIntent::AlongPrev | NavIntent::AcrossPrev, Some(index)) => {
                segment_at(step_circular(index, len, false))
            }
            (NavIntent::PageForward, Some(index)) => segment_at(step_clamped(index, len, page, true)),
            (NavIntent::PageBack, Some(index)) => segment_at(step_clamped(index, len, page, false)),
        };
        next.map_or(NavOutcome::Ignore, NavOutcome::Move)
    }

    fn hover_position_index(&self, cache: &SceneCache) -> Option<usize> {
        let x = self
            .pointer
            .hovered_point
            .as_ref()
            .map(|point| point.x)
            .or_else(|| self.pointer.hovered_group.as_ref().map(|group| group.x))?;
        cache.nearest_position_index(x)
    }

    fn move_focus(&mut self, next: FocusState) {
        if next == self.navigation.focus {
            return;
        }
        debug!(?next, "focus moved");
        self.navigation.focus = next.clone();
        self.navigation.root_focused = true;
        self.emit(CoordinatorEvent::FocusChanged(next));

        if !self.apply_focus_highlight() {
            self.apply_clear_highlight();
            self.reset_legend_highlight();
            self.hide_unpinned_tooltip();
        }
        self.draw_focus_outline();
        self.announce_focus();
    }

    /// Enter/Space on a group or point pins the tooltip there.
    fn activate_focus(&mut self) {
        let (point, group): (Option<PointRef>, Group) = match &self.navigation.focus {
            FocusState::Chart => return,
            FocusState::Group { group } => (None, group.clone()),
            FocusState::Point { point, group } => (Some(point.clone()), group.clone()),
        };
        debug!(x = group.x, "tooltip pinned by keyboard");
        self.set_tooltip_state(TooltipState {
            visible: true,
            pinned: true,
            point,
            group: Some(group),
        });
        self.apply_tooltip_highlight();
        self.announce_focus();
    }
}
