//! City markers sized by a random value; clicking one zooms onto it

use crate::{
    core::{
        config::DemoOptions,
        mode::{CameraTarget, DemoSpec, HandlerAction, HomeControl, ModeSpec},
    },
    data::geojson::FeatureCollection,
    input::events::InteractionKind,
    layers::{
        base::{LayerKind, LayerSpec},
        style::StepExpression,
    },
};
use serde_json::{json, Value};

pub const SOURCE_ID: &str = "mysource";
pub const CIRCLE_LAYER: &str = "mycircle";
pub const LABEL_LAYER: &str = "mycircle-value";

pub fn circle_color() -> StepExpression {
    StepExpression::new("value", "#000000")
        .stop(10.0, "#fbb03b")
        .stop(50.0, "#223b53")
        .stop(200.0, "#e26a6a")
        .stop(500.0, "#aa8f00")
        .stop(800.0, "#3498db")
}

/// Legacy zoom-function radius, kept as the demos write it
pub(crate) fn circle_radius() -> Value {
    json!({
        "property": "value",
        "stops": [[10, 8], [50, 9], [100, 12], [500, 16], [800, 25]]
    })
}

pub(crate) fn circle_layer(color: &StepExpression) -> LayerSpec {
    LayerSpec::new(CIRCLE_LAYER, LayerKind::Circle, SOURCE_ID).with_paint(json!({
        "circle-color": color.to_expression(),
        "circle-radius": circle_radius(),
        "circle-stroke-width": 1,
        "circle-stroke-color": "#fff",
        "circle-opacity": 0.75
    }))
}

pub(crate) fn label_layer() -> LayerSpec {
    LayerSpec::new(LABEL_LAYER, LayerKind::Symbol, SOURCE_ID).with_layout(json!({
        "text-field": "{value}",
        "text-size": 10
    }))
}

pub fn build(options: DemoOptions, mut cities: FeatureCollection) -> DemoSpec {
    if let Some(values) = &options.values {
        cities.assign_random_values(values);
    }

    let color = circle_color();
    let overview = ModeSpec::new(
        cities,
        CameraTarget::DatasetFeature {
            index: 0,
            zoom: options.camera.zoom,
        },
    )
    .layer(label_layer())
    .layer(circle_layer(&color))
    .on(InteractionKind::MouseEnter, CIRCLE_LAYER, HandlerAction::PointerCursor)
    .on(InteractionKind::MouseLeave, CIRCLE_LAYER, HandlerAction::ResetCursor)
    .on(
        InteractionKind::Click,
        CIRCLE_LAYER,
        HandlerAction::ZoomToFeature {
            zoom: options.drill_down.zoom,
        },
    )
    .legend("Value", color.legend());

    DemoSpec {
        name: "zooming".to_string(),
        options,
        source_id: SOURCE_ID.to_string(),
        overview,
        drill_down: None,
        home: HomeControl::None,
        navigation: None,
        page_elements: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::RandomValueConfig, geo::LatLng};
    use crate::data::geojson::{Feature, Geometry, Properties};

    #[test]
    fn test_values_are_assigned_in_range() {
        let cities: FeatureCollection = (0..20)
            .map(|i| Feature::new(Geometry::point(LatLng::new(30.0, -100.0 + i as f64)), Properties::new()))
            .collect();
        let mut options = DemoOptions::default();
        options.values = Some(RandomValueConfig {
            seed: Some(7),
            ..RandomValueConfig::default()
        });

        let demo = build(options, cities);
        for feature in demo.overview.dataset.iter() {
            let value = feature.property_f64("value").unwrap();
            assert!((10.0..=1000.0).contains(&value));
            assert_eq!(value.fract(), 0.0);
        }
    }

    #[test]
    fn test_label_drawn_under_circle() {
        let demo = build(DemoOptions::default(), FeatureCollection::default());
        assert_eq!(demo.overview.layer_ids(), vec![LABEL_LAYER, CIRCLE_LAYER]);
        assert!(demo.drill_down.is_none());
    }
}
