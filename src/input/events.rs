use crate::core::geo::{LatLng, Point};
use crate::data::geojson::Feature;
use serde::{Deserialize, Serialize};

/// Pointer interactions an engine reports per layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Click,
    MouseEnter,
    MouseLeave,
    MouseMove,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::Click => write!(f, "click"),
            InteractionKind::MouseEnter => write!(f, "mouseenter"),
            InteractionKind::MouseLeave => write!(f, "mouseleave"),
            InteractionKind::MouseMove => write!(f, "mousemove"),
        }
    }
}

/// One interaction delivered by the engine for a registered layer
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub layer_id: String,
    /// Container pixel under the pointer
    pub point: Point,
    /// Geographic position under the pointer
    pub lng_lat: LatLng,
    /// Features of `layer_id` under the pointer, topmost first
    pub features: Vec<Feature>,
}

impl InteractionEvent {
    pub fn new(kind: InteractionKind, layer_id: impl Into<String>, point: Point, lng_lat: LatLng) -> Self {
        Self {
            kind,
            layer_id: layer_id.into(),
            point,
            lng_lat,
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }
}

/// Cursor style of the map canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}
