use std::cell::RefCell;
use std::rc::Rc;

use chart_interaction::core::{EmphasisState, Rect, SeriesKind};
use chart_interaction::extensions::{CoordinatorEvent, CoordinatorObserver};
use chart_interaction::interaction::{ManualClock, MarkerShape};
use chart_interaction::render::{MemoryEngine, MemoryPoint, MemorySeries, RenderingEngine};
use chart_interaction::{CoordinatorConfig, InteractionCoordinator};

type Coordinator = InteractionCoordinator<MemoryEngine>;

struct EventLog {
    events: Rc<RefCell<Vec<CoordinatorEvent>>>,
}

impl CoordinatorObserver for EventLog {
    fn id(&self) -> &str {
        "event-log"
    }

    fn on_event(&mut self, event: &CoordinatorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn surface() -> MemoryEngine {
    MemoryEngine::new(
        Rect::new(0.0, 0.0, 400.0, 300.0),
        Rect::new(40.0, 20.0, 320.0, 240.0),
    )
}

fn mixed_engine() -> MemoryEngine {
    surface()
        .with_series(
            MemorySeries::new(SeriesKind::Line, "A")
                .with_color("#1f77b4")
                .with_values([(0.0, Some(1.0)), (1.0, Some(2.0))]),
        )
        .with_series(
            MemorySeries::new(SeriesKind::Column, "B").with_values([(0.0, Some(3.0)), (1.0, Some(4.0))]),
        )
        .with_series(
            MemorySeries::new(SeriesKind::ErrorRange, "A errors")
                .linked_to("A")
                .with_point(MemoryPoint::range(1.0, 1.5, 2.5)),
        )
        .with_series(MemorySeries::new(SeriesKind::YThreshold, "limit").with_values([(0.0, Some(3.5))]))
}

fn render(coordinator: &mut Coordinator) {
    coordinator.engine_mut().redraw();
    coordinator.on_render();
}

fn mount(engine: MemoryEngine) -> Coordinator {
    let mut coordinator =
        InteractionCoordinator::with_clock(engine, CoordinatorConfig::default(), ManualClock::new())
            .expect("coordinator init");
    render(&mut coordinator);
    coordinator
}

fn legend_ids(coordinator: &Coordinator) -> Vec<&str> {
    coordinator
        .legend_items()
        .iter()
        .map(|item| item.id.as_str())
        .collect()
}

fn highlighted_ids(coordinator: &Coordinator) -> Vec<&str> {
    coordinator
        .legend_items()
        .iter()
        .filter(|item| item.highlighted)
        .map(|item| item.id.as_str())
        .collect()
}

#[test]
fn legend_lists_series_with_markers() {
    let coordinator = mount(mixed_engine());
    let items = coordinator.legend_items();

    assert_eq!(legend_ids(&coordinator), vec!["A", "B", "limit"]);
    assert_eq!(items[0].marker.shape, MarkerShape::Line);
    assert_eq!(items[0].marker.color.as_deref(), Some("#1f77b4"));
    assert_eq!(items[1].marker.shape, MarkerShape::Square);
    assert_eq!(items[2].marker.shape, MarkerShape::Dashed);
    assert!(items.iter().all(|item| item.visible && !item.highlighted));
}

#[test]
fn pie_legend_lists_segments() {
    let engine = surface().with_series(
        MemorySeries::new(SeriesKind::Donut, "Share")
            .with_point(MemoryPoint::new(0.0, Some(3.0)).with_name("north"))
            .with_point(MemoryPoint::new(1.0, Some(2.0)).with_id("s").with_name("south")),
    );
    let coordinator = mount(engine);

    assert_eq!(legend_ids(&coordinator), vec!["north", "s"]);
    assert_eq!(coordinator.legend_items()[1].name, "south");
    assert_eq!(coordinator.legend_items()[0].marker.shape, MarkerShape::Circle);
}

#[test]
fn visibility_goes_through_engine_and_next_render() {
    let mut coordinator = mount(mixed_engine());

    coordinator.set_items_visible(&["A", "limit"]).expect("visibility");
    assert_eq!(coordinator.engine().series_visible("B"), Some(false));
    // The legend is derived and only updates after the engine re-renders.
    assert!(coordinator.legend_items()[1].visible);

    render(&mut coordinator);
    let items = coordinator.legend_items();
    assert!(items[0].visible);
    assert!(!items[1].visible);
    assert!(items[2].visible);
    assert_eq!(coordinator.engine().series_visible("A errors"), Some(true));
}

#[test]
fn mutating_a_legend_copy_does_not_touch_the_engine() {
    let mut coordinator = mount(mixed_engine());
    let mut items = coordinator.legend_items().to_vec();
    items[1].visible = false;

    render(&mut coordinator);
    assert_eq!(coordinator.engine().series_visible("B"), Some(true));
    assert!(coordinator.legend_items()[1].visible);
}

#[test]
fn visibility_request_event_lists_known_ids_only() {
    let mut coordinator = mount(mixed_engine());
    let events = Rc::new(RefCell::new(Vec::new()));
    coordinator
        .subscribe(Box::new(EventLog {
            events: events.clone(),
        }))
        .expect("subscribe");

    coordinator
        .set_items_visible(&["B", "missing"])
        .expect("visibility");

    let events = events.borrow();
    assert!(events.contains(&CoordinatorEvent::VisibilityRequested {
        visible_ids: vec!["B".to_owned()],
    }));
    assert_eq!(coordinator.engine().series_visible("A"), Some(false));
}

#[test]
fn unchanged_rerender_emits_no_legend_update() {
    let mut coordinator = mount(mixed_engine());
    let events = Rc::new(RefCell::new(Vec::new()));
    coordinator
        .subscribe(Box::new(EventLog {
            events: events.clone(),
        }))
        .expect("subscribe");

    render(&mut coordinator);
    render(&mut coordinator);

    let legend_updates = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, CoordinatorEvent::LegendChanged(_)))
        .count();
    assert_eq!(legend_updates, 0);
}

#[test]
fn hover_marks_legend_rows_highlighted() {
    let mut coordinator = mount(mixed_engine());
    let b0 = coordinator.engine().scene().series[1].points[0].handle;

    coordinator.on_point_hover(b0).expect("hover");
    assert_eq!(highlighted_ids(&coordinator), vec!["B"]);

    coordinator.show_tooltip_on_group(1.0).expect("group tooltip");
    assert_eq!(highlighted_ids(&coordinator), vec!["A", "B"]);

    coordinator.hide_tooltip();
    assert!(highlighted_ids(&coordinator).is_empty());
}

#[test]
fn legend_hover_routes_through_highlight_and_restores_tooltip_highlight() {
    let mut coordinator = mount(mixed_engine());
    let b0 = coordinator.engine().scene().series[1].points[0].handle;
    coordinator.show_tooltip_on_point(b0).expect("tooltip on B");

    coordinator.highlight_legend_item("A").expect("legend hover");
    assert_eq!(
        coordinator.engine().series_emphasis("B"),
        Some(EmphasisState::Inactive)
    );
    assert_eq!(highlighted_ids(&coordinator), vec!["A"]);

    coordinator.clear_legend_highlight().expect("legend leave");
    assert_eq!(
        coordinator.engine().series_emphasis("A"),
        Some(EmphasisState::Inactive)
    );
    assert_eq!(
        coordinator.engine().series_emphasis("B"),
        Some(EmphasisState::Normal)
    );
    assert_eq!(highlighted_ids(&coordinator), vec!["B"]);
}

#[test]
fn external_legend_marking_leaves_emphasis_alone() {
    let mut coordinator = mount(mixed_engine());

    coordinator
        .highlight_legend_items(&["limit", "A"])
        .expect("mark legend rows");
    assert_eq!(highlighted_ids(&coordinator), vec!["A", "limit"]);
    assert_eq!(
        coordinator.engine().series_emphasis("B"),
        Some(EmphasisState::Normal)
    );

    render(&mut coordinator);
    assert_eq!(highlighted_ids(&coordinator), vec!["A", "limit"]);
}
