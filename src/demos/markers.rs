//! City markers whose popup links through to wifi listings.
//!
//! Home is the navigation control's home button; the page carries max-bounds
//! and legend checkboxes.

use super::zooming::{circle_layer, label_layer, CIRCLE_LAYER, SOURCE_ID};
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
    ui::{
        controls::NavigationConfig,
        page::PageElement,
        popup::{AnchorMode, PopupRow, PopupTemplate},
    },
};
use serde_json::json;

pub const WIFI_LAYER: &str = "wifi-price";
pub const WIFI_LABEL_LAYER: &str = "wifi-price-value";

pub fn city_color() -> StepExpression {
    StepExpression::new("value", "#000000")
        .stop(10.0, "#fbb03b")
        .stop(50.0, "#223b53")
        .stop(150.0, "#e26a6a")
        .stop(250.0, "#aa8f00")
        .stop(350.0, "#3498db")
        .stop(450.0, "#3477db")
        .stop(650.0, "#2277db")
        .stop(700.0, "#bb77db")
        .stop(750.0, "#0077db")
        .stop(800.0, "#3aa7db")
}

pub fn price_color() -> StepExpression {
    StepExpression::new("price", "#51bbd6")
        .stop(100.0, "#f1f075")
        .stop(350.0, "#f28cb1")
}

pub fn wifi_layer() -> LayerSpec {
    let radius = StepExpression::new("price", 10).stop(100.0, 12).stop(300.0, 30);
    LayerSpec::new(WIFI_LAYER, LayerKind::Circle, SOURCE_ID)
        .with_paint(json!({
            "circle-color": price_color().to_expression(),
            "circle-radius": radius.to_expression(),
            "circle-stroke-width": 2,
            "circle-stroke-color": "#fff",
            "circle-opacity": 0.65
        }))
        .with_filter(LayerFilter::has("price"))
}

pub fn wifi_label_layer() -> LayerSpec {
    LayerSpec::new(WIFI_LABEL_LAYER, LayerKind::Symbol, SOURCE_ID)
        .with_layout(json!({
            "text-field": "{price}",
            "text-size": 10
        }))
        .with_filter(LayerFilter::has("price"))
}

pub fn city_popup() -> PopupTemplate {
    PopupTemplate::new("info-popup", AnchorMode::Feature)
        .row(PopupRow::new("City", "City"))
        .row(PopupRow::new("Value", "value"))
        .with_link("See more", "here")
        .with_close_button()
}

pub fn wifi_popup() -> PopupTemplate {
    PopupTemplate::new("info-popup", AnchorMode::Feature)
        .row(PopupRow::new("Name", "name"))
        .row(PopupRow::new("Price", "price").with_prefix("$"))
        .row(PopupRow::new("Host", "host_name"))
        .with_close_button()
}

pub fn build(options: DemoOptions, mut cities: FeatureCollection, wifi: FeatureCollection) -> DemoSpec {
    if let Some(values) = &options.values {
        cities.assign_random_values(values);
    }

    let color = city_color();
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
    .on(InteractionKind::Click, CIRCLE_LAYER, HandlerAction::ClickPopup(city_popup()))
    .legend("Value", color.legend());

    let drill_down = ModeSpec::new(
        wifi,
        CameraTarget::DatasetFeature {
            index: options.drill_down.focus_index.unwrap_or(0),
            zoom: options.drill_down.zoom,
        },
    )
    .layer(wifi_layer())
    .layer(wifi_label_layer())
    .on(InteractionKind::MouseEnter, WIFI_LAYER, HandlerAction::PointerCursor)
    .on(InteractionKind::MouseLeave, WIFI_LAYER, HandlerAction::ResetCursor)
    .on(InteractionKind::Click, WIFI_LAYER, HandlerAction::ClickPopup(wifi_popup()))
    .with_home()
    .legend("Price", price_color().legend());

    DemoSpec {
        name: "markers".to_string(),
        options,
        source_id: SOURCE_ID.to_string(),
        overview,
        drill_down: Some(drill_down),
        home: HomeControl::Navigation,
        navigation: Some(NavigationConfig::default()),
        page_elements: vec![PageElement::MaxBoundsToggle, PageElement::LegendToggle],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_legend() {
        let legend = price_color().legend();
        let labels: Vec<_> = legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["< 100", "100 - 350", "350+"]);
        assert_eq!(legend[2].output, json!("#f28cb1"));
    }

    #[test]
    fn test_wifi_layers_require_price() {
        assert_eq!(wifi_layer().filter, Some(LayerFilter::has("price")));
        assert_eq!(wifi_label_layer().layout["text-field"], json!("{price}"));
    }

    #[test]
    fn test_city_popup_links_through() {
        let popup = city_popup();
        assert_eq!(popup.link.as_ref().map(|l| l.caption.as_str()), Some("See more"));
        assert_eq!(popup.anchor, AnchorMode::Feature);
    }
}
