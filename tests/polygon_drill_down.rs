mod common;

use common::{assert_close, engine_for, fixtures, start};
use mapmode::{
    demos::{
        polygon::{COUNTIES_LAYER, SOURCE_ID, STATES_LAYER},
        DemoKind,
    },
    prelude::*,
};

const CALIFORNIA: LatLng = LatLng {
    lat: 36.7,
    lng: -119.4,
};

fn click_state(controller: &ModeController<HeadlessEngine>, at: LatLng) -> InteractionEvent {
    let point = controller.engine().pixel_of(&at);
    let mut events = controller.engine().click(point);
    assert_eq!(events.len(), 1, "expected exactly one layer hit");
    events.remove(0)
}

#[test]
fn test_click_california_drills_into_counties() {
    let mut controller = start(DemoKind::Polygon);
    let event = click_state(&controller, CALIFORNIA);
    assert_eq!(event.layer_id, STATES_LAYER);
    assert_eq!(event.features[0].property_f64("value"), Some(12000.0));

    let outcome = controller.handle_event(&event).unwrap();
    assert_eq!(outcome, InteractionOutcome::Handled);
    assert_eq!(controller.mode(), Mode::DrillDown);

    let counties = FeatureCollection::from_file(fixtures().join("us_polygon.json")).unwrap();
    assert_eq!(controller.engine().source_data(SOURCE_ID), Some(&counties));
    assert_eq!(controller.engine().layer_ids(), vec![COUNTIES_LAYER]);

    let camera = controller.engine().camera();
    assert_eq!(camera.zoom, 6.0);
    assert_close(camera.center, event.lng_lat);
    assert_eq!(
        controller.engine().camera_log().last().map(|m| m.style),
        Some(TransitionStyle::Fly)
    );
    assert!(controller.page().is_visible(PageElement::BackButton));
}

#[test]
fn test_back_restores_overview() {
    let mut controller = start(DemoKind::Polygon);
    let layers_before = controller.engine().layer_ids();
    let data_before = controller.engine().source_data(SOURCE_ID).cloned();
    let camera_before = controller.engine().camera();

    let event = click_state(&controller, CALIFORNIA);
    controller.handle_event(&event).unwrap();
    assert_eq!(controller.state().generation, 1);

    let outcome = controller.page_action(PageAction::Back).unwrap();
    assert_eq!(outcome, InteractionOutcome::Handled);
    assert_eq!(controller.mode(), Mode::Overview);
    assert_eq!(controller.engine().layer_ids(), layers_before);
    assert_eq!(controller.engine().source_data(SOURCE_ID).cloned(), data_before);
    assert_eq!(controller.engine().camera(), camera_before);
    assert!(!controller.page().is_visible(PageElement::BackButton));
    assert_eq!(controller.state().generation, 2);
}

#[test]
fn test_repeated_transitions_are_no_ops() {
    let mut controller = start(DemoKind::Polygon);
    assert_eq!(
        controller.return_to_overview().unwrap(),
        InteractionOutcome::NoOp
    );

    let event = click_state(&controller, CALIFORNIA);
    controller.enter_drill_down(&event).unwrap();
    let camera_moves = controller.engine().camera_log().len();

    assert_eq!(
        controller.enter_drill_down(&event).unwrap(),
        InteractionOutcome::NoOp
    );
    assert_eq!(controller.engine().camera_log().len(), camera_moves);
    assert_eq!(controller.state().generation, 1);
}

#[test]
fn test_click_without_features_changes_nothing() {
    let mut controller = start(DemoKind::Polygon);
    let camera = controller.engine().camera();
    let moves = controller.engine().camera_log().len();

    let empty = InteractionEvent::new(InteractionKind::Click, STATES_LAYER, Point::new(1.0, 1.0), CALIFORNIA);
    let outcome = controller.handle_event(&empty).unwrap();

    assert_eq!(outcome, InteractionOutcome::NotFound);
    assert_eq!(controller.mode(), Mode::Overview);
    assert_eq!(controller.engine().camera(), camera);
    assert_eq!(controller.engine().camera_log().len(), moves);
    assert_eq!(controller.state().generation, 0);
}

#[test]
fn test_overview_layer_is_silent_after_drill_down() {
    let mut controller = start(DemoKind::Polygon);
    let event = click_state(&controller, CALIFORNIA);
    controller.handle_event(&event).unwrap();

    assert!(!controller
        .engine()
        .is_registered(InteractionKind::Click, STATES_LAYER));

    // Late delivery of an overview event gets no response
    let outcome = controller.handle_event(&event).unwrap();
    assert_eq!(outcome, InteractionOutcome::Unbound);
    assert_eq!(controller.mode(), Mode::DrillDown);
}

#[test]
fn test_state_hover_popup_follows_pointer() {
    let mut controller = start(DemoKind::Polygon);
    let point = controller.engine().pixel_of(&CALIFORNIA);

    let events = controller.engine_mut().pointer_move(point);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, InteractionKind::MouseMove);
    controller.handle_event(&events[0]).unwrap();

    let popup = controller.engine().popup().unwrap();
    assert_eq!(popup.class, "state-info-popup");
    assert!(popup.text().starts_with("Title: California\nValue: 12000"));
    assert!(!popup.close_button);
    assert_close(popup.position, events[0].lng_lat);
    assert_eq!(controller.engine().cursor(), Cursor::Pointer);

    let ocean = controller.engine().pixel_of(&LatLng::new(30.0, -135.0));
    let events = controller.engine_mut().pointer_move(ocean);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, InteractionKind::MouseLeave);
    controller.handle_event(&events[0]).unwrap();

    assert!(controller.engine().popup().is_none());
    assert_eq!(controller.engine().cursor(), Cursor::Default);
}

#[test]
fn test_county_click_popup_and_back_dismisses_it() {
    let mut controller = start(DemoKind::Polygon);
    let event = click_state(&controller, CALIFORNIA);
    controller.handle_event(&event).unwrap();

    let fresno = LatLng::new(36.75, -119.65);
    let point = controller.engine().pixel_of(&fresno);
    let events = controller.engine().click(point);
    assert_eq!(events.len(), 1);
    // The county seat point is filtered out of the fill layer
    assert_eq!(events[0].features.len(), 1);

    controller.handle_event(&events[0]).unwrap();
    let popup = controller.popup().unwrap();
    assert_eq!(popup.class, "info-popup");
    assert_eq!(popup.text(), "Title: Fresno County\nValue: 450\nElement: 06019");
    assert!(popup.close_button);
    assert!(popup.to_html().contains("<input value=\"06019\">"));

    assert_eq!(controller.close_popup(), InteractionOutcome::Handled);
    assert!(controller.engine().popup().is_none());
    assert_eq!(controller.close_popup(), InteractionOutcome::NoOp);

    controller.handle_event(&events[0]).unwrap();
    controller.page_action(PageAction::Back).unwrap();
    assert!(controller.engine().popup().is_none());
    assert!(controller.popup().is_none());
}

#[test]
fn test_transitions_before_load_fail_fast() {
    let demo = DemoKind::Polygon.build(&fixtures()).unwrap();
    let engine = engine_for(&demo);
    let mut controller = ModeController::new(engine, demo, PageControls::all()).unwrap();
    assert!(!controller.is_ready());
    assert!(controller.engine().layer_ids().is_empty());

    let event = InteractionEvent::new(InteractionKind::Click, STATES_LAYER, Point::default(), CALIFORNIA);
    assert!(matches!(
        controller.enter_drill_down(&event),
        Err(MapError::NotReady)
    ));
    assert!(matches!(controller.return_to_overview(), Err(MapError::NotReady)));

    controller.engine_mut().finish_loading();
    controller.pump().unwrap();
    assert_eq!(controller.engine().layer_ids(), vec![STATES_LAYER]);
}

#[test]
fn test_missing_back_button_is_fatal() {
    let demo = DemoKind::Polygon.build(&fixtures()).unwrap();
    let engine = engine_for(&demo);
    let result = ModeController::new(engine, demo, PageControls::new([PageElement::LegendToggle]));
    assert!(matches!(result, Err(MapError::Config(_))));
}
