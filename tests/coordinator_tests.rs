use std::cell::RefCell;
use std::rc::Rc;

use chart_interaction::core::{Rect, SeriesKind};
use chart_interaction::extensions::{CoordinatorEvent, CoordinatorObserver};
use chart_interaction::interaction::{FocusState, ManualClock, NavKey, WritingDirection};
use chart_interaction::render::{MemoryEngine, MemorySeries};
use chart_interaction::{ChartError, CoordinatorConfig, InteractionCoordinator};

type Coordinator = InteractionCoordinator<MemoryEngine>;

struct Recorder {
    id: String,
    events: Rc<RefCell<Vec<CoordinatorEvent>>>,
}

impl Recorder {
    fn new(id: impl Into<String>, events: Rc<RefCell<Vec<CoordinatorEvent>>>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl CoordinatorObserver for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &CoordinatorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn event_kind(event: &CoordinatorEvent) -> &'static str {
    match event {
        CoordinatorEvent::Rendered { .. } => "rendered",
        CoordinatorEvent::TooltipChanged(_) => "tooltip",
        CoordinatorEvent::FocusChanged(_) => "focus",
        CoordinatorEvent::LegendChanged(_) => "legend",
        CoordinatorEvent::AnchorUpdated(_) => "anchor",
        CoordinatorEvent::PointHighlighted { .. } => "point",
        CoordinatorEvent::GroupHighlighted { .. } => "group",
        CoordinatorEvent::HighlightCleared => "cleared",
        CoordinatorEvent::VisibilityRequested { .. } => "visibility",
    }
}

fn line_engine() -> MemoryEngine {
    MemoryEngine::new(
        Rect::new(0.0, 0.0, 400.0, 300.0),
        Rect::new(40.0, 20.0, 320.0, 240.0),
    )
    .with_series(
        MemorySeries::new(SeriesKind::Line, "A")
            .with_values([(0.0, Some(1.0)), (1.0, Some(2.0)), (2.0, Some(3.0))]),
    )
}

fn render(coordinator: &mut Coordinator) {
    coordinator.engine_mut().redraw();
    coordinator.on_render();
}

#[test]
fn config_round_trips_through_json() {
    let config = CoordinatorConfig::default()
        .with_writing_direction(WritingDirection::Rtl)
        .with_page_size_ratio(0.1)
        .with_chart_label("Quarterly revenue");
    let json = config.to_json_pretty().expect("serialize config");
    let restored = CoordinatorConfig::from_json_str(&json).expect("parse config");
    assert_eq!(restored, config);
}

#[test]
fn missing_config_fields_fall_back_to_defaults() {
    let config = CoordinatorConfig::from_json_str(r#"{ "leave_debounce_ms": 120 }"#)
        .expect("parse partial config");
    assert_eq!(config.leave_debounce_ms, 120);
    assert_eq!(config.dismiss_cooldown_ms, 250);
    assert!(config.keyboard_navigation);
    assert_eq!(config.writing_direction, WritingDirection::Ltr);
}

#[test]
fn malformed_config_json_is_rejected() {
    let err = CoordinatorConfig::from_json_str("{ not json").expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn invalid_config_values_are_rejected() {
    let bad_ratio = CoordinatorConfig::default().with_page_size_ratio(0.0);
    let init = InteractionCoordinator::with_clock(line_engine(), bad_ratio, ManualClock::new());
    assert!(matches!(init, Err(ChartError::InvalidConfig(_))));

    let blank_label = CoordinatorConfig::default().with_chart_label("   ");
    let init = InteractionCoordinator::with_clock(line_engine(), blank_label, ManualClock::new());
    assert!(matches!(init, Err(ChartError::InvalidConfig(_))));

    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    let err = coordinator
        .set_config(CoordinatorConfig::default().with_page_size_ratio(f64::NAN))
        .expect_err("nan ratio");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn observer_ids_must_be_unique_and_non_empty() {
    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    let events = Rc::new(RefCell::new(Vec::new()));

    coordinator
        .subscribe(Box::new(Recorder::new("views", events.clone())))
        .expect("subscribe");
    assert!(
        coordinator
            .subscribe(Box::new(Recorder::new("views", events.clone())))
            .is_err()
    );
    assert!(
        coordinator
            .subscribe(Box::new(Recorder::new("", events.clone())))
            .is_err()
    );
    assert_eq!(coordinator.observer_count(), 1);
    assert!(coordinator.has_observer("views"));

    assert!(coordinator.unsubscribe("views"));
    assert!(!coordinator.unsubscribe("views"));
    assert_eq!(coordinator.observer_count(), 0);
}

#[test]
fn observers_see_render_then_state_events_in_order() {
    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    let events = Rc::new(RefCell::new(Vec::new()));
    coordinator
        .subscribe(Box::new(Recorder::new("views", events.clone())))
        .expect("subscribe");

    assert!(!coordinator.has_rendered());
    coordinator.engine_mut().redraw();
    coordinator.on_load();
    assert!(coordinator.has_rendered());

    coordinator.on_key(NavKey::Home).expect("key");

    let kinds: Vec<&'static str> = events.borrow().iter().map(event_kind).collect();
    assert_eq!(&kinds[..2], &["legend", "rendered"]);
    let after_key = &kinds[2..];
    assert_eq!(after_key.first(), Some(&"focus"));
    assert!(after_key.contains(&"group"));
    assert_eq!(after_key.last(), Some(&"anchor"));
}

#[test]
fn render_schedules_overlay_refresh_when_shapes_exist() {
    let clock = ManualClock::new();
    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), clock.clone())
            .expect("coordinator init");
    render(&mut coordinator);
    coordinator.on_key(NavKey::Home).expect("key");
    coordinator.poll_timers();
    assert_eq!(coordinator.overlay_shape_count(), 1);

    clock.advance(10);
    render(&mut coordinator);
    assert_eq!(coordinator.next_timer_deadline(), Some(10));
    assert_eq!(coordinator.poll_timers(), 1);
    assert_eq!(coordinator.overlay_shape_count(), 1);
    assert_eq!(coordinator.engine().shapes().len(), 1);
}

#[test]
fn destroy_removes_overlays_and_cancels_timers() {
    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    render(&mut coordinator);
    coordinator.on_key(NavKey::End).expect("key");
    assert!(matches!(coordinator.focus_state(), FocusState::Group { .. }));
    assert!(coordinator.next_timer_deadline().is_some());

    let engine = coordinator.destroy();
    assert!(engine.shapes().is_empty());
}

#[test]
fn custom_chart_label_is_announced_on_focus() {
    let config = CoordinatorConfig::default().with_chart_label("Revenue by quarter");
    let mut coordinator = InteractionCoordinator::with_clock(line_engine(), config, ManualClock::new())
        .expect("coordinator init");
    render(&mut coordinator);

    coordinator.on_focus_in().expect("focus in");
    let anchor = coordinator.focus_anchor().expect("announcement");
    assert_eq!(anchor.label, "Revenue by quarter");
}

#[test]
fn pointer_handlers_require_a_render() {
    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    assert!(matches!(
        coordinator.on_click(None),
        Err(ChartError::SceneNotRendered { operation: "on_click" })
    ));
    assert!(coordinator.scene_cache("scene_cache").is_err());
}

#[test]
fn unchanged_rerenders_do_not_republish_tooltip_or_focus() {
    let mut coordinator =
        InteractionCoordinator::with_clock(line_engine(), CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    render(&mut coordinator);
    coordinator.on_key(NavKey::Home).expect("focus first group");
    let first_handle = coordinator
        .tooltip_state()
        .group
        .as_ref()
        .and_then(|group| group.points.first())
        .map(|point| point.handle)
        .expect("tooltip group point");

    let events = Rc::new(RefCell::new(Vec::new()));
    coordinator
        .subscribe(Box::new(Recorder::new("views", events.clone())))
        .expect("subscribe");
    for _ in 0..3 {
        render(&mut coordinator);
    }

    let kinds: Vec<&'static str> = events.borrow().iter().map(event_kind).collect();
    assert_eq!(kinds, vec!["rendered"; 3]);

    let refreshed_handle = coordinator
        .tooltip_state()
        .group
        .as_ref()
        .and_then(|group| group.points.first())
        .map(|point| point.handle)
        .expect("tooltip group point");
    assert_ne!(refreshed_handle, first_handle);
    assert!(coordinator.tooltip_state().visible);
}
