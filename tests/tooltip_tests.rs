use approx::assert_relative_eq;
use chart_interaction::api::TooltipAnchorSource;
use chart_interaction::core::{PointHandle, Rect, SeriesKind, ValueRange};
use chart_interaction::interaction::{ManualClock, TooltipState};
use chart_interaction::render::{MemoryEngine, MemoryPoint, MemorySeries, RenderingEngine};
use chart_interaction::{ChartError, CoordinatorConfig, InteractionCoordinator};

type Coordinator = InteractionCoordinator<MemoryEngine>;

fn surface() -> MemoryEngine {
    MemoryEngine::new(
        Rect::new(0.0, 0.0, 400.0, 300.0),
        Rect::new(40.0, 20.0, 320.0, 240.0),
    )
}

fn error_engine() -> MemoryEngine {
    surface()
        .with_series(
            MemorySeries::new(SeriesKind::Line, "A")
                .with_values([(0.0, Some(1.0)), (1.0, Some(2.0))]),
        )
        .with_series(
            MemorySeries::new(SeriesKind::ErrorRange, "A errors")
                .linked_to("A")
                .with_point(MemoryPoint::range(1.0, 1.5, 2.5)),
        )
        .with_series(
            MemorySeries::new(SeriesKind::Line, "B")
                .with_values([(0.0, Some(3.0)), (1.0, Some(4.0))]),
        )
        .with_series(
            MemorySeries::new(SeriesKind::ErrorRange, "B errors")
                .with_point(MemoryPoint::range(1.0, 3.0, 5.0)),
        )
        .with_series(
            MemorySeries::new(SeriesKind::ErrorRange, "orphan")
                .linked_to("nope")
                .with_point(MemoryPoint::range(1.0, 0.0, 9.0)),
        )
}

fn pie_engine() -> MemoryEngine {
    surface().with_series(
        MemorySeries::new(SeriesKind::Pie, "Share")
            .with_point(MemoryPoint::new(0.0, Some(3.0)).with_name("north"))
            .with_point(MemoryPoint::new(1.0, Some(2.0)).with_name("south")),
    )
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

fn point_handle(coordinator: &Coordinator, series: usize, point: usize) -> PointHandle {
    coordinator.engine().scene().series[series].points[point].handle
}

#[test]
fn point_tooltip_lists_whole_group_with_attached_error_ranges() {
    let mut coordinator = mount(error_engine());
    let a1 = point_handle(&coordinator, 0, 1);
    assert!(coordinator.show_tooltip_on_point(a1).expect("show"));

    let content = coordinator
        .tooltip_content()
        .expect("content")
        .expect("visible tooltip");
    assert_eq!(content.x, 1.0);
    assert_eq!(content.items.len(), 2);

    let a = content
        .items
        .iter()
        .find(|item| item.series_id == "A")
        .expect("row for A");
    assert_eq!(a.point_id, "1:2");
    assert_eq!(a.error_ranges.len(), 1);
    assert_eq!(a.error_ranges[0].series_id, "A errors");
    assert_eq!(a.error_ranges[0].range, ValueRange::new(1.5, 2.5));

    // No explicit link: attaches to the closest preceding series.
    let b = content
        .items
        .iter()
        .find(|item| item.series_id == "B")
        .expect("row for B");
    let ids: Vec<&str> = b
        .error_ranges
        .iter()
        .map(|range| range.series_id.as_str())
        .collect();
    assert_eq!(ids, vec!["B errors"]);
}

#[test]
fn broken_error_range_link_is_omitted() {
    let mut coordinator = mount(error_engine());
    coordinator.show_tooltip_on_group(1.0).expect("show");
    render(&mut coordinator);

    let content = coordinator
        .tooltip_content()
        .expect("content")
        .expect("visible tooltip");
    assert!(
        content
            .items
            .iter()
            .flat_map(|item| item.error_ranges.iter())
            .all(|range| range.series_id != "orphan")
    );
}

#[test]
fn pie_point_tooltip_has_single_row() {
    let mut coordinator = mount(pie_engine());
    let south = point_handle(&coordinator, 0, 1);
    coordinator.show_tooltip_on_point(south).expect("show");

    let content = coordinator
        .tooltip_content()
        .expect("content")
        .expect("visible tooltip");
    assert_eq!(content.items.len(), 1);
    assert_eq!(content.items[0].point_id, "south");
    assert_eq!(content.items[0].series_name, "Share");
}

#[test]
fn hidden_tooltip_has_no_content_or_placement() {
    let mut coordinator = mount(error_engine());
    assert!(coordinator.tooltip_content().expect("content").is_none());
    assert!(coordinator.tooltip_placement().expect("placement").is_none());
}

#[test]
fn pie_segments_use_exact_engine_anchor() {
    let mut coordinator = mount(pie_engine());
    let north = point_handle(&coordinator, 0, 0);
    let plot = coordinator.engine().scene().series[0].points[0].plot;
    coordinator.show_tooltip_on_point(north).expect("show");

    let placement = coordinator
        .tooltip_placement()
        .expect("placement")
        .expect("visible tooltip");
    assert_eq!(placement.source, TooltipAnchorSource::ExactAnchor);
    assert_eq!(placement.anchor, Rect::at_point(plot));
}

#[test]
fn cartesian_points_use_computed_anchor_inside_plot() {
    let mut coordinator = mount(error_engine());
    let a1 = point_handle(&coordinator, 0, 1);
    let plot = coordinator.engine().scene().series[0].points[1].plot;
    coordinator.show_tooltip_on_point(a1).expect("show");

    let placement = coordinator
        .tooltip_placement()
        .expect("placement")
        .expect("visible tooltip");
    assert_eq!(placement.source, TooltipAnchorSource::ComputedPoint);
    assert_relative_eq!(placement.anchor.x, plot.x);
    assert_relative_eq!(placement.anchor.width, 0.0);

    let group_rect = coordinator
        .scene_cache("test")
        .expect("cache")
        .group_rect(1.0)
        .expect("group rect");
    assert_relative_eq!(placement.anchor.y, group_rect.y);
    assert_relative_eq!(placement.anchor.height, group_rect.height);
}

#[test]
fn group_tooltip_anchors_to_group_rect() {
    let mut coordinator = mount(error_engine());
    coordinator.show_tooltip_on_group(0.0).expect("show");
    let group_rect = coordinator
        .scene_cache("test")
        .expect("cache")
        .group_rect(0.0)
        .expect("group rect");

    let placement = coordinator
        .tooltip_placement()
        .expect("placement")
        .expect("visible tooltip");
    assert_eq!(placement.source, TooltipAnchorSource::GroupRect);
    assert_eq!(placement.anchor, group_rect);
}

#[test]
fn destroyed_target_hides_tooltip_on_next_use() {
    let mut coordinator = mount(error_engine());
    let a1 = point_handle(&coordinator, 0, 1);
    coordinator.show_tooltip_on_point(a1).expect("show");

    // Engine re-renders but the host has not forwarded the callback yet.
    coordinator.engine_mut().redraw();

    assert!(coordinator.tooltip_placement().expect("placement").is_none());
    assert_eq!(coordinator.tooltip_state(), &TooltipState::default());
}

#[test]
fn tooltip_survives_rerender_with_fresh_handles() {
    let mut coordinator = mount(error_engine());
    let a1 = point_handle(&coordinator, 0, 1);
    coordinator.show_tooltip_on_point(a1).expect("show");
    render(&mut coordinator);

    let fresh = coordinator
        .tooltip_state()
        .point
        .as_ref()
        .map(|point| point.handle)
        .expect("tooltip point");
    assert_ne!(fresh, a1);
    assert_eq!(fresh, point_handle(&coordinator, 0, 1));
    assert!(coordinator.tooltip_placement().expect("placement").is_some());
}

#[test]
fn unknown_targets_are_reported_not_shown() {
    let mut coordinator = mount(error_engine());
    assert!(!coordinator.show_tooltip_on_group(42.0).expect("show"));
    let error_point = point_handle(&coordinator, 1, 0);
    assert!(!coordinator.show_tooltip_on_point(error_point).expect("show"));
    assert!(!coordinator.tooltip_state().visible);
}

#[test]
fn tooltip_accessors_require_a_render() {
    let mut coordinator = InteractionCoordinator::with_clock(
        error_engine(),
        CoordinatorConfig::default(),
        ManualClock::new(),
    )
    .expect("coordinator init");

    let err = coordinator.tooltip_content().expect_err("must fail");
    assert!(matches!(
        err,
        ChartError::SceneNotRendered {
            operation: "tooltip_content"
        }
    ));
}
