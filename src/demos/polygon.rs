//! US states choropleth drilling down into counties

use crate::{
    core::{
        config::DemoOptions,
        mode::{CameraTarget, DemoSpec, HandlerAction, HomeControl, ModeSpec},
    },
    data::geojson::{FeatureCollection, GeometryType},
    input::events::InteractionKind,
    layers::{
        base::{LayerFilter, LayerKind, LayerSpec},
        style::StepExpression,
    },
    ui::{
        page::PageElement,
        popup::{AnchorMode, PopupRow, PopupTemplate},
    },
};
use serde_json::json;

pub const SOURCE_ID: &str = "ussource";
pub const STATES_LAYER: &str = "us-states-layer";
pub const COUNTIES_LAYER: &str = "us-counties-layer";

pub fn state_fill() -> StepExpression {
    StepExpression::new("value", "#888888")
        .stop(1000.0, "red")
        .stop(10000.0, "pink")
        .stop(50000.0, "blue")
        .stop(100000.0, "green")
}

pub fn county_fill() -> StepExpression {
    StepExpression::new("value", "#888888")
        .stop(10.0, "red")
        .stop(100.0, "pink")
        .stop(200.0, "blue")
        .stop(300.0, "green")
        .stop(400.0, "cyan")
        .stop(500.0, "yellow")
        .stop(700.0, "purple")
        .stop(1000.0, "#f022bb")
}

pub fn states_layer() -> LayerSpec {
    LayerSpec::new(STATES_LAYER, LayerKind::Fill, SOURCE_ID).with_paint(json!({
        "fill-color": state_fill().to_expression(),
        "fill-opacity": 0.4
    }))
}

pub fn counties_layer() -> LayerSpec {
    LayerSpec::new(COUNTIES_LAYER, LayerKind::Fill, SOURCE_ID)
        .with_paint(json!({
            "fill-color": county_fill().to_expression(),
            "fill-opacity": 0.4
        }))
        .with_filter(LayerFilter::GeometryType(GeometryType::Polygon))
}

fn info_template(class: &str, anchor: AnchorMode) -> PopupTemplate {
    PopupTemplate::new(class, anchor)
        .row(PopupRow::new("Title", "title"))
        .row(PopupRow::new("Value", "value"))
        .row(PopupRow::new("Element", "element").editable())
}

pub fn build(options: DemoOptions, states: FeatureCollection, counties: FeatureCollection) -> DemoSpec {
    let overview = ModeSpec::new(states, CameraTarget::Fixed(options.camera.to_camera()))
        .layer(states_layer())
        .on(
            InteractionKind::MouseMove,
            STATES_LAYER,
            HandlerAction::HoverPopup(info_template("state-info-popup", AnchorMode::Pointer)),
        )
        .on(InteractionKind::MouseLeave, STATES_LAYER, HandlerAction::ResetCursor)
        .on(InteractionKind::Click, STATES_LAYER, HandlerAction::DrillDown)
        .legend("States", state_fill().legend());

    let drill_down = ModeSpec::new(
        counties,
        CameraTarget::Trigger {
            zoom: options.drill_down.zoom,
        },
    )
    .layer(counties_layer())
    .on(InteractionKind::MouseEnter, COUNTIES_LAYER, HandlerAction::PointerCursor)
    .on(InteractionKind::MouseLeave, COUNTIES_LAYER, HandlerAction::ResetCursor)
    .on(
        InteractionKind::Click,
        COUNTIES_LAYER,
        HandlerAction::ClickPopup(
            info_template("info-popup", AnchorMode::Pointer).with_close_button(),
        ),
    )
    .with_home()
    .legend("Counties", county_fill().legend());

    DemoSpec {
        name: "polygon".to_string(),
        options,
        source_id: SOURCE_ID.to_string(),
        overview,
        drill_down: Some(drill_down),
        home: HomeControl::BackButton,
        navigation: None,
        page_elements: vec![PageElement::BackButton],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_colors() {
        let fill = state_fill();
        assert_eq!(fill.evaluate(500.0), &json!("#888888"));
        assert_eq!(fill.evaluate(12000.0), &json!("pink"));
        assert_eq!(fill.evaluate(250000.0), &json!("green"));
    }

    #[test]
    fn test_counties_filter_polygons() {
        let layer = counties_layer();
        assert_eq!(
            layer.to_style_json()["filter"],
            json!(["==", "$type", "Polygon"])
        );
    }

    #[test]
    fn test_modes_bind_disjoint_layers() {
        let demo = build(
            DemoOptions::default(),
            FeatureCollection::default(),
            FeatureCollection::default(),
        );
        let drill = demo.drill_down.as_ref().unwrap();
        assert_eq!(demo.overview.layer_ids(), vec![STATES_LAYER]);
        assert_eq!(drill.layer_ids(), vec![COUNTIES_LAYER]);
        assert!(drill.show_home);
        assert!(!demo.overview.show_home);
    }
}
