mod common;

use common::{assert_close, fixtures, start, start_with};
use mapmode::{
    demos::{
        clustering::{CLUSTERS_LAYER, POINTS_LAYER, SOURCE_ID},
        DemoKind,
    },
    prelude::*,
};
use serde_json::json;

fn cluster_click(controller: &ModeController<HeadlessEngine>) -> InteractionEvent {
    let clusters = controller.engine().rendered_features(CLUSTERS_LAYER);
    assert_eq!(clusters.len(), 1, "the four Manhattan pins share one cluster");
    assert_eq!(clusters[0].property_f64("point_count"), Some(4.0));

    let point = controller.engine().pixel_of(&clusters[0].anchor().unwrap());
    let mut events = controller.engine().click(point);
    assert_eq!(events.len(), 1);
    events.remove(0)
}

fn pin(title: &str, lat: f64, lng: f64, extra: Option<(&str, serde_json::Value)>) -> Feature {
    let mut properties = mapmode::data::geojson::Properties::new();
    properties.insert("title".into(), json!(title));
    properties.insert("value".into(), json!(42));
    if let Some((key, value)) = extra {
        properties.insert(key.into(), value);
    }
    Feature::new(Geometry::point(LatLng::new(lat, lng)), properties)
}

#[test]
fn test_loads_centered_on_last_pin() {
    let controller = start(DemoKind::Clustering);
    let camera = controller.engine().camera();
    // Focus index is past the end of the dataset
    assert_close(camera.center, LatLng::new(39.7392, -104.9903));
    assert_eq!(camera.zoom, 5.0);
    assert_eq!(
        controller.engine().layer_ids(),
        vec![CLUSTERS_LAYER, POINTS_LAYER, "cluster-count"]
    );
}

#[test]
fn test_cluster_click_eases_to_expansion_zoom() {
    let mut controller = start(DemoKind::Clustering);
    let event = cluster_click(&controller);
    let center = event.features[0].anchor().unwrap();

    let outcome = controller.handle_event(&event).unwrap();
    assert_eq!(outcome, InteractionOutcome::Handled);

    let camera = controller.engine().camera();
    assert_eq!(camera.zoom, 10.0);
    assert_close(camera.center, center);
    assert_eq!(
        controller.engine().camera_log().last().map(|m| m.style),
        Some(TransitionStyle::Ease)
    );

    // At the expansion zoom the cluster no longer holds every pin
    let counts: Vec<_> = controller
        .engine()
        .rendered_features(CLUSTERS_LAYER)
        .iter()
        .filter_map(|f| f.property_f64("point_count"))
        .collect();
    assert!(counts.iter().all(|c| *c < 4.0));
    assert_eq!(controller.mode(), Mode::Overview);
}

#[test]
fn test_failed_lookups_leave_camera_alone() {
    let mut controller = start(DemoKind::Clustering);
    let camera = controller.engine().camera();
    let at = LatLng::new(40.7, -74.0);

    let unknown = InteractionEvent::new(InteractionKind::Click, CLUSTERS_LAYER, Point::default(), at)
        .with_features(vec![pin("ghost", 40.7, -74.0, Some(("cluster_id", json!(999_999))))]);
    assert_eq!(
        controller.handle_event(&unknown).unwrap(),
        InteractionOutcome::LookupFailed
    );

    let not_a_cluster = InteractionEvent::new(InteractionKind::Click, CLUSTERS_LAYER, Point::default(), at)
        .with_features(vec![pin("lone", 40.7, -74.0, None)]);
    assert_eq!(
        controller.handle_event(&not_a_cluster).unwrap(),
        InteractionOutcome::LookupFailed
    );

    let empty = InteractionEvent::new(InteractionKind::Click, CLUSTERS_LAYER, Point::default(), at);
    assert_eq!(
        controller.handle_event(&empty).unwrap(),
        InteractionOutcome::NotFound
    );

    assert_eq!(controller.engine().camera(), camera);
}

#[test]
fn test_hover_popup_across_the_antimeridian() {
    let mut controller = start(DemoKind::Clustering);
    let suva = pin("Suva", -18.1416, 178.4419, None);

    let enter = InteractionEvent::new(
        InteractionKind::MouseEnter,
        POINTS_LAYER,
        Point::default(),
        LatLng::new(-18.0, -170.0),
    )
    .with_features(vec![suva]);
    controller.handle_event(&enter).unwrap();

    let popup = controller.engine().popup().unwrap();
    assert_eq!(popup.class, "pushpin-popup");
    assert_eq!(popup.text(), "Title: Suva\nValue: 42");
    assert!((popup.position.lng - (178.4419 - 360.0)).abs() < 1e-9);
    assert_eq!(popup.position.lat, -18.1416);
    assert_eq!(controller.engine().cursor(), Cursor::Pointer);

    let leave = InteractionEvent::new(
        InteractionKind::MouseLeave,
        POINTS_LAYER,
        Point::default(),
        LatLng::new(0.0, 0.0),
    );
    controller.handle_event(&leave).unwrap();
    assert!(controller.engine().popup().is_none());
    assert_eq!(controller.engine().cursor(), Cursor::Default);
}

#[test]
fn test_hovering_a_real_pin() {
    let mut controller = start(DemoKind::Clustering);
    let denver = LatLng::new(39.7392, -104.9903);
    let point = controller.engine().pixel_of(&denver);

    let events = controller.engine_mut().pointer_move(point);
    let enter = events
        .iter()
        .find(|e| e.kind == InteractionKind::MouseEnter && e.layer_id == POINTS_LAYER)
        .unwrap();
    controller.handle_event(enter).unwrap();

    let popup = controller.popup().unwrap();
    assert_eq!(popup.text(), "Title: Denver\nValue: 57");
    assert_close(popup.position, denver);
}

#[test]
fn test_expansion_after_mode_change_is_stale() {
    let mut demo = DemoKind::Clustering.build(&fixtures()).unwrap();
    let detail = FeatureCollection::new(vec![pin("detail", 40.7, -74.0, None)]);
    demo.drill_down = Some(
        ModeSpec::new(detail, CameraTarget::Trigger { zoom: 8.0 })
            .layer(LayerSpec::new("detail", LayerKind::Circle, SOURCE_ID)),
    );

    let mut controller = start_with(demo);
    controller.engine_mut().set_defer_callbacks(true);

    let event = cluster_click(&controller);
    assert_eq!(
        controller.handle_event(&event).unwrap(),
        InteractionOutcome::Pending
    );

    controller.enter_drill_down(&event).unwrap();
    let camera = controller.engine().camera();
    assert_eq!(camera.zoom, 8.0);

    assert_eq!(controller.engine_mut().flush_callbacks(), 1);
    assert_eq!(controller.pump().unwrap(), vec![InteractionOutcome::Stale]);
    assert_eq!(controller.engine().camera(), camera);
    assert_eq!(controller.mode(), Mode::DrillDown);
}

#[test]
fn test_new_lookup_pending_despite_queued_stale_answer() {
    let mut demo = DemoKind::Clustering.build(&fixtures()).unwrap();
    let detail = FeatureCollection::new(vec![pin("detail", 40.7, -74.0, None)]);
    demo.drill_down = Some(
        ModeSpec::new(detail, CameraTarget::Trigger { zoom: 8.0 })
            .layer(LayerSpec::new("detail", LayerKind::Circle, SOURCE_ID)),
    );

    let mut controller = start_with(demo);
    controller.engine_mut().set_defer_callbacks(true);

    let event = cluster_click(&controller);
    assert_eq!(
        controller.handle_event(&event).unwrap(),
        InteractionOutcome::Pending
    );
    controller.enter_drill_down(&event).unwrap();
    controller.return_to_overview().unwrap();
    // The first answer arrives after the round trip and is now stale
    assert_eq!(controller.engine_mut().flush_callbacks(), 1);

    let event = cluster_click(&controller);
    assert_eq!(
        controller.handle_event(&event).unwrap(),
        InteractionOutcome::Pending
    );
    assert_eq!(controller.engine().camera().zoom, 5.0);

    assert_eq!(controller.engine_mut().flush_callbacks(), 1);
    assert_eq!(controller.pump().unwrap(), vec![InteractionOutcome::Handled]);
    assert_eq!(controller.engine().camera().zoom, 10.0);
}

#[test]
fn test_deferred_expansion_applies_when_current() {
    let mut controller = start(DemoKind::Clustering);
    controller.engine_mut().set_defer_callbacks(true);

    let event = cluster_click(&controller);
    assert_eq!(
        controller.handle_event(&event).unwrap(),
        InteractionOutcome::Pending
    );
    assert_eq!(controller.engine().camera().zoom, 5.0);

    controller.engine_mut().flush_callbacks();
    assert_eq!(controller.pump().unwrap(), vec![InteractionOutcome::Handled]);
    assert_eq!(controller.engine().camera().zoom, 10.0);
}

#[test]
fn test_clustering_has_no_drill_down() {
    let mut controller = start(DemoKind::Clustering);
    let event = cluster_click(&controller);
    assert!(matches!(
        controller.enter_drill_down(&event),
        Err(MapError::Config(_))
    ));
    assert_eq!(controller.mode(), Mode::Overview);
    assert_eq!(controller.state().generation, 0);
}
