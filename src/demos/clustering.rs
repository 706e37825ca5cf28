//! Clustered pushpins with hover popups and click-to-expand clusters

use crate::{
    core::{
        config::DemoOptions,
        mode::{CameraTarget, DemoSpec, HandlerAction, HomeControl, ModeSpec},
    },
    data::geojson::FeatureCollection,
    input::events::InteractionKind,
    layers::{
        base::{LayerFilter, LayerKind, LayerSpec},
        style::StepExpression,
    },
    ui::popup::{AnchorMode, PopupRow, PopupTemplate},
};
use serde_json::json;

pub const SOURCE_ID: &str = "mysource";
pub const CLUSTERS_LAYER: &str = "clusters";
pub const POINTS_LAYER: &str = "unclustered-point";
pub const COUNT_LAYER: &str = "cluster-count";

pub fn cluster_color() -> StepExpression {
    StepExpression::new("point_count", "#51bbd6")
        .stop(0.0, "#f28cb1")
        .stop(50.0, "#f1f075")
        .stop(100.0, "cyan")
}

pub fn layers() -> Vec<LayerSpec> {
    let radius = StepExpression::new("point_count", 10)
        .stop(100.0, 20)
        .stop(150.0, 30)
        .stop(750.0, 40);

    vec![
        LayerSpec::new(CLUSTERS_LAYER, LayerKind::Circle, SOURCE_ID)
            .with_paint(json!({
                "circle-color": cluster_color().to_expression(),
                "circle-radius": radius.to_expression()
            }))
            .with_filter(LayerFilter::has("point_count")),
        LayerSpec::new(POINTS_LAYER, LayerKind::Circle, SOURCE_ID)
            .with_paint(json!({
                "circle-color": [
                    "interpolate", ["linear"], ["number", ["get", "value"]],
                    0, "yellow", 50, "red", 100, "green"
                ],
                "circle-radius": 10,
                "circle-stroke-width": 1,
                "circle-stroke-color": "#fff",
                "circle-opacity": 0.75
            }))
            .with_filter(LayerFilter::not_has("point_count")),
        LayerSpec::new(COUNT_LAYER, LayerKind::Symbol, SOURCE_ID)
            .with_layout(json!({
                "text-field": "{point_count_abbreviated}",
                "text-font": ["DIN Offc Pro Medium", "Arial Unicode MS Bold"],
                "text-size": 12
            }))
            .with_filter(LayerFilter::has("point_count")),
    ]
}

/// Hover popup; anchored on the pin's world copy nearest the pointer
pub fn pushpin_popup() -> PopupTemplate {
    PopupTemplate::new("pushpin-popup", AnchorMode::Feature)
        .row(PopupRow::new("Title", "title"))
        .row(PopupRow::new("Value", "value"))
}

pub fn build(options: DemoOptions, pushpins: FeatureCollection) -> DemoSpec {
    let mut overview = ModeSpec::new(
        pushpins,
        CameraTarget::DatasetFeature {
            index: options.camera.focus_index.unwrap_or(0),
            zoom: options.camera.zoom,
        },
    )
    .on(
        InteractionKind::MouseEnter,
        POINTS_LAYER,
        HandlerAction::HoverPopup(pushpin_popup()),
    )
    .on(InteractionKind::MouseLeave, POINTS_LAYER, HandlerAction::ResetCursor)
    .on(InteractionKind::Click, CLUSTERS_LAYER, HandlerAction::ExpandCluster)
    .legend("Pushpins", cluster_color().legend());
    overview.layers = layers();

    DemoSpec {
        name: "clustering".to_string(),
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

    #[test]
    fn test_cluster_layers_split_on_point_count() {
        let layers = layers();
        assert_eq!(layers[0].filter, Some(LayerFilter::has("point_count")));
        assert_eq!(layers[1].filter, Some(LayerFilter::not_has("point_count")));
        assert_eq!(layers[2].layout["text-field"], json!("{point_count_abbreviated}"));
    }

    #[test]
    fn test_hover_popup_has_no_close_button() {
        let template = pushpin_popup();
        assert!(!template.close_button);
        assert_eq!(template.anchor, AnchorMode::Feature);
    }
}
