use crate::{
    core::geo::LatLng,
    data::geojson::Feature,
    traits::MapEngine,
};
use serde::{Deserialize, Serialize};

/// Where a popup opened from a pointer event is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// At the pointer position
    Pointer,
    /// At the feature's own coordinate, on the world copy nearest the pointer
    Feature,
}

/// One labelled property line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupRow {
    pub label: String,
    pub property: String,
    /// Text placed before the value, e.g. a currency sign
    #[serde(default)]
    pub prefix: String,
    /// Rendered as an input field instead of plain text
    #[serde(default)]
    pub editable: bool,
}

impl PopupRow {
    pub fn new(label: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            property: property.into(),
            prefix: String::new(),
            editable: false,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }
}

/// Follow-up affordance inside a popup ("See more")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupLink {
    pub caption: String,
    pub text: String,
}

/// Which properties a popup shows and how it behaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupTemplate {
    pub class: String,
    pub rows: Vec<PopupRow>,
    #[serde(default)]
    pub link: Option<PopupLink>,
    pub anchor: AnchorMode,
    #[serde(default)]
    pub close_button: bool,
}

impl PopupTemplate {
    pub fn new(class: impl Into<String>, anchor: AnchorMode) -> Self {
        Self {
            class: class.into(),
            rows: Vec::new(),
            link: None,
            anchor,
            close_button: false,
        }
    }

    pub fn row(mut self, row: PopupRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_link(mut self, caption: impl Into<String>, text: impl Into<String>) -> Self {
        self.link = Some(PopupLink {
            caption: caption.into(),
            text: text.into(),
        });
        self
    }

    pub fn with_close_button(mut self) -> Self {
        self.close_button = true;
        self
    }
}

/// A formatted popup anchored on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub class: String,
    pub position: LatLng,
    /// (label, formatted value, editable)
    pub rows: Vec<(String, String, bool)>,
    pub link: Option<PopupLink>,
    pub close_button: bool,
}

impl Popup {
    /// Plain-text summary, one `Label: value` per line
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|(label, value, _)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Markup for HTML-based engines
    pub fn to_html(&self) -> String {
        let mut html = format!("<div class=\"{}\">", escape(&self.class));
        for (label, value, editable) in &self.rows {
            if *editable {
                html.push_str(&format!(
                    "<p class=\"element\"><span>{}:</span><input value=\"{}\"></p>",
                    escape(label),
                    escape(value)
                ));
            } else {
                html.push_str(&format!(
                    "<p><span>{}:</span><span>{}</span></p>",
                    escape(label),
                    escape(value)
                ));
            }
        }
        html.push_str("</div>");
        if let Some(link) = &self.link {
            html.push_str(&format!(
                "<div class=\"see-more\">{}: <a href=\"#\" class=\"see-more-link\">{}</a></div>",
                escape(&link.caption),
                escape(&link.text)
            ));
        }
        html
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Anchor longitude moved onto the world copy nearest the pointer
pub fn normalize_anchor(anchor: LatLng, pointer: LatLng) -> LatLng {
    anchor.nearest_copy_to(&pointer)
}

/// Formats feature attributes into a popup and keeps at most one open
#[derive(Debug, Default)]
pub struct PopupPresenter {
    current: Option<Popup>,
}

impl PopupPresenter {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<&Popup> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Formats `feature` without showing it
    pub fn format(template: &PopupTemplate, feature: &Feature, position: LatLng) -> Popup {
        let rows = template
            .rows
            .iter()
            .map(|row| {
                let value = feature.property_text(&row.property).unwrap_or_default();
                (row.label.clone(), format!("{}{}", row.prefix, value), row.editable)
            })
            .collect();

        Popup {
            class: template.class.clone(),
            position,
            rows,
            link: template.link.clone(),
            close_button: template.close_button,
        }
    }

    /// Where the popup goes: the pointer, or the feature near the pointer,
    /// or the feature itself when no pointer is given
    pub fn resolve_anchor(
        template: &PopupTemplate,
        feature: &Feature,
        pointer: Option<LatLng>,
    ) -> Option<LatLng> {
        match (template.anchor, pointer) {
            (AnchorMode::Pointer, Some(pointer)) => Some(pointer),
            (AnchorMode::Feature, Some(pointer)) => {
                feature.anchor().map(|a| normalize_anchor(a, pointer))
            }
            (_, None) => feature.anchor(),
        }
    }

    /// Shows a popup for `feature`, replacing any open one
    pub fn present<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        template: &PopupTemplate,
        feature: &Feature,
        pointer: Option<LatLng>,
    ) -> Option<&Popup> {
        let position = Self::resolve_anchor(template, feature, pointer)?;
        let popup = Self::format(template, feature, position);

        engine.show_popup(&popup);
        self.current = Some(popup);
        self.current.as_ref()
    }

    /// Removes the open popup, if any
    pub fn dismiss<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        if self.current.take().is_some() {
            engine.remove_popup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::{Geometry, Properties};
    use serde_json::json;

    fn pushpin(lng: f64) -> Feature {
        let mut properties = Properties::new();
        properties.insert("title".into(), json!("Pin"));
        properties.insert("value".into(), json!(42));
        Feature::new(Geometry::point(LatLng::new(10.0, lng)), properties)
    }

    fn hover_template() -> PopupTemplate {
        PopupTemplate::new("pushpin-popup", AnchorMode::Feature)
            .row(PopupRow::new("Title", "title"))
            .row(PopupRow::new("Value", "value"))
    }

    #[test]
    fn test_normalize_anchor_near_antimeridian() {
        let anchor = normalize_anchor(LatLng::new(0.0, 170.0), LatLng::new(0.0, -170.0));
        assert_eq!(anchor.lng, -190.0);
    }

    #[test]
    fn test_hover_anchor_uses_nearest_world_copy() {
        let anchor =
            PopupPresenter::resolve_anchor(&hover_template(), &pushpin(170.0), Some(LatLng::new(10.0, -170.0)))
                .unwrap();
        assert_eq!(anchor, LatLng::new(10.0, -190.0));
    }

    #[test]
    fn test_without_pointer_anchor_is_feature() {
        let anchor = PopupPresenter::resolve_anchor(&hover_template(), &pushpin(170.0), None).unwrap();
        assert_eq!(anchor, LatLng::new(10.0, 170.0));
    }

    #[test]
    fn test_pointer_anchor_mode() {
        let template = PopupTemplate::new("state-info-popup", AnchorMode::Pointer);
        let pointer = LatLng::new(36.0, -119.0);
        let anchor = PopupPresenter::resolve_anchor(&template, &pushpin(170.0), Some(pointer));
        assert_eq!(anchor, Some(pointer));
    }

    #[test]
    fn test_format_rows_and_prefix() {
        let template = PopupTemplate::new("info-popup", AnchorMode::Feature)
            .row(PopupRow::new("Value", "value").with_prefix("$"))
            .row(PopupRow::new("Host", "host_name"));
        let popup = PopupPresenter::format(&template, &pushpin(0.0), LatLng::default());

        assert_eq!(popup.text(), "Value: $42\nHost: ");
        assert!(popup.to_html().contains("<span>$42</span>"));
    }

    #[test]
    fn test_html_escapes_values() {
        let mut feature = pushpin(0.0);
        feature.properties.insert("title".into(), json!("<b>"));
        let popup = PopupPresenter::format(&hover_template(), &feature, LatLng::default());
        assert!(popup.to_html().contains("&lt;b&gt;"));
    }
}
