use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};
use crate::extensions::{CoordinatorEvent, CoordinatorObserver};
use crate::interaction::{Clock, SystemClock, TooltipState, WritingDirection};
use crate::render::{EmphasisGate, RenderingEngine};

use super::config_validation::validate_coordinator_config;
use super::highlight_controller::HighlightStore;
use super::legend_synchronizer::LegendState;
use super::navigation_controller::NavigationState;
use super::overlay_shapes::OverlayShapes;
use super::pointer_coordinator::PointerState;
use super::timer_scheduler::CoordinatorTimers;
use super::tooltip_content::ErrorRangeLinks;
use super::{AnnouncementFormatter, CoordinatorConfig, DefaultAnnouncementFormatter, SceneCache};

/// Per-chart interaction facade consumed by host applications.
///
/// `InteractionCoordinator` owns the engine handle and the one authoritative
/// hover/focus/tooltip/legend state of a chart instance. Its lifetime is the
/// chart's mount lifetime: create it on mount, feed it engine callbacks, and
/// `destroy` it on unmount.
pub struct InteractionCoordinator<E: RenderingEngine> {
    pub(super) engine: E,
    pub(super) config: CoordinatorConfig,
    pub(super) clock: Box<dyn Clock>,
    pub(super) cache: Option<SceneCache>,
    pub(super) gate: EmphasisGate,
    pub(super) highlight: HighlightStore,
    pub(super) pointer: PointerState,
    pub(super) tooltip: TooltipState,
    pub(super) navigation: NavigationState,
    pub(super) legend: LegendState,
    pub(super) timers: CoordinatorTimers,
    pub(super) overlays: OverlayShapes,
    pub(super) links: ErrorRangeLinks,
    pub(super) announcer: Box<dyn AnnouncementFormatter>,
    pub(super) observers: Vec<Box<dyn CoordinatorObserver>>,
}

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Creates a coordinator driven by the monotonic system clock.
    pub fn new(engine: E, config: CoordinatorConfig) -> ChartResult<Self> {
        Self::with_clock(engine, config, SystemClock::default())
    }

    /// Creates a coordinator driven by an explicit clock (e.g. `ManualClock` in tests).
    pub fn with_clock(
        engine: E,
        config: CoordinatorConfig,
        clock: impl Clock + 'static,
    ) -> ChartResult<Self> {
        validate_coordinator_config(&config)?;
        Ok(Self {
            engine,
            config,
            clock: Box::new(clock),
            cache: None,
            gate: EmphasisGate::new(),
            highlight: HighlightStore::default(),
            pointer: PointerState::default(),
            tooltip: TooltipState::default(),
            navigation: NavigationState::default(),
            legend: LegendState::default(),
            timers: CoordinatorTimers::default(),
            overlays: OverlayShapes::default(),
            links: ErrorRangeLinks::default(),
            announcer: Box::new(DefaultAnnouncementFormatter),
            observers: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_announcement_formatter(
        mut self,
        formatter: impl AnnouncementFormatter + 'static,
    ) -> Self {
        self.announcer = Box::new(formatter);
        self
    }

    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CoordinatorConfig) -> ChartResult<()> {
        validate_coordinator_config(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn set_writing_direction(&mut self, direction: WritingDirection) {
        self.config.writing_direction = direction;
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access for data updates. Call `on_render` after the
    /// engine re-renders; cached state is stale until then.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Position index of the latest render.
    pub fn scene_cache(&self, operation: &'static str) -> ChartResult<&SceneCache> {
        self.cache
            .as_ref()
            .ok_or(ChartError::SceneNotRendered { operation })
    }

    #[must_use]
    pub fn has_rendered(&self) -> bool {
        self.cache.is_some()
    }

    /// Engine load callback; identical to a render.
    pub fn on_load(&mut self) {
        self.on_render();
    }

    /// Engine render callback. Must run once per re-render before any other handler.
    pub fn on_render(&mut self) {
        let cache = SceneCache::rebuild(self.engine.scene());
        let generation = cache.generation();
        self.cache = Some(cache);

        self.engine.install_emphasis_gate(self.gate.clone());
        self.restore_highlight();
        self.links.resolve(self.engine.scene());

        self.revalidate_focus();
        self.revalidate_pointer_hover();
        self.revalidate_tooltip();
        self.rebuild_legend();

        if self.overlays.has_any() {
            let now = self.clock.now_ms();
            self.timers.overlay_refresh.schedule(now, 0);
        }
        debug!(generation, "coordinator render");
        self.emit(CoordinatorEvent::Rendered { generation });
    }

    /// Tears the instance down: cancels timers, removes overlay shapes and
    /// hands the engine back.
    #[must_use]
    pub fn destroy(mut self) -> E {
        self.timers.cancel_all();
        self.overlays.remove_all(&mut self.engine);
        self.observers.clear();
        debug!("coordinator destroyed");
        self.engine
    }

    /// Replaces tooltip state, emitting `TooltipChanged` only on change.
    pub(super) fn set_tooltip_state(&mut self, next: TooltipState) {
        if self.tooltip == next {
            return;
        }
        self.tooltip = next;
        let snapshot = self.tooltip.clone();
        self.emit(CoordinatorEvent::TooltipChanged(snapshot));
    }

    fn revalidate_tooltip(&mut self) {
        let Some(group) = self.tooltip.group.as_ref() else {
            return;
        };
        let Some(cache) = self.cache.as_ref() else {
            return;
        };

        let refreshed = match &self.tooltip.point {
            Some(point) => cache.point(&point.key).and_then(|fresh| {
                cache
                    .group(fresh.x)
                    .map(|group| (Some(fresh.clone()), group.clone()))
            }),
            None => cache.group(group.x).map(|group| (None, group.clone())),
        };

        match refreshed {
            Some((point, group)) => {
                let next = TooltipState {
                    point,
                    group: Some(group),
                    ..self.tooltip.clone()
                };
                if next.same_target(&self.tooltip) {
                    self.tooltip = next;
                } else {
                    self.set_tooltip_state(next);
                }
            }
            None => {
                if self.tooltip.visible {
                    warn!("tooltip target no longer exists in the scene, hiding tooltip");
                }
                self.set_tooltip_state(TooltipState::default());
            }
        }
    }
}
