use crate::data::geojson::{Feature, GeometryType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Fill,
    Circle,
    Symbol,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Fill => write!(f, "fill"),
            LayerKind::Circle => write!(f, "circle"),
            LayerKind::Symbol => write!(f, "symbol"),
        }
    }
}

/// Feature filter attached to a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerFilter {
    /// `["has", key]`
    Has(String),
    /// `["!", ["has", key]]`
    NotHas(String),
    /// `["==", "$type", kind]`
    GeometryType(GeometryType),
}

impl LayerFilter {
    pub fn has(key: impl Into<String>) -> Self {
        Self::Has(key.into())
    }

    pub fn not_has(key: impl Into<String>) -> Self {
        Self::NotHas(key.into())
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            Self::Has(key) => feature.has_property(key),
            Self::NotHas(key) => !feature.has_property(key),
            Self::GeometryType(kind) => feature.geometry.geometry_type() == *kind,
        }
    }

    /// Engine expression form of the filter
    pub fn to_expression(&self) -> Value {
        match self {
            Self::Has(key) => json!(["has", key]),
            Self::NotHas(key) => json!(["!", ["has", key]]),
            Self::GeometryType(kind) => {
                let name = match kind {
                    GeometryType::Point => "Point",
                    GeometryType::LineString => "LineString",
                    GeometryType::Polygon => "Polygon",
                };
                json!(["==", "$type", name])
            }
        }
    }
}

/// Declarative description of one renderable layer.
///
/// Built once per demo; the controller only attaches and detaches it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
    pub source: String,
    #[serde(default)]
    pub paint: Value,
    #[serde(default)]
    pub layout: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<LayerFilter>,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, kind: LayerKind, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            paint: Value::Null,
            layout: Value::Null,
            filter: None,
        }
    }

    pub fn with_paint(mut self, paint: Value) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_layout(mut self, layout: Value) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_filter(mut self, filter: LayerFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether a feature of the bound source is drawn by this layer
    pub fn accepts(&self, feature: &Feature) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(feature))
    }

    /// Engine style-spec JSON for this layer
    pub fn to_style_json(&self) -> Value {
        let mut layer = json!({
            "id": self.id,
            "type": self.kind.to_string(),
            "source": self.source,
        });
        if !self.paint.is_null() {
            layer["paint"] = self.paint.clone();
        }
        if !self.layout.is_null() {
            layer["layout"] = self.layout.clone();
        }
        if let Some(filter) = &self.filter {
            layer["filter"] = filter.to_expression();
        }
        layer
    }
}
