//! View modes and their declarative description
//!
//! A demo is a pair of [`ModeSpec`]s. Switching modes never mutates a spec:
//! the controller detaches what the old spec attached and attaches what the
//! new one lists.

use crate::{
    core::{
        config::DemoOptions,
        geo::LatLng,
        viewport::Camera,
    },
    data::geojson::FeatureCollection,
    input::events::InteractionKind,
    layers::{base::LayerSpec, style::LegendEntry},
    ui::{controls::NavigationConfig, page::PageElement, popup::PopupTemplate},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Overview,
    DrillDown,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Overview => write!(f, "overview"),
            Mode::DrillDown => write!(f, "drill-down"),
        }
    }
}

/// What a registered interaction does
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerAction {
    /// Pointer cursor
    PointerCursor,
    /// Default cursor; also closes a hover popup
    ResetCursor,
    /// Pointer cursor plus a popup following the hovered feature
    HoverPopup(PopupTemplate),
    /// Popup for the clicked feature
    ClickPopup(PopupTemplate),
    /// Enter drill-down with the clicked feature as trigger
    DrillDown,
    /// Move the camera onto the clicked feature
    ZoomToFeature { zoom: f64 },
    /// Ease to the clicked cluster's expansion zoom
    ExpandCluster,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerBinding {
    pub kind: InteractionKind,
    pub layer_id: String,
    pub action: HandlerAction,
}

impl HandlerBinding {
    pub fn new(kind: InteractionKind, layer_id: impl Into<String>, action: HandlerAction) -> Self {
        Self {
            kind,
            layer_id: layer_id.into(),
            action,
        }
    }
}

/// Where the camera goes when a mode becomes active
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTarget {
    Fixed(Camera),
    /// The location of the triggering interaction
    Trigger { zoom: f64 },
    /// A feature of the mode's dataset; the last feature if `index` is out of range
    DatasetFeature { index: usize, zoom: f64 },
}

impl CameraTarget {
    /// `None` when the target needs a trigger or a feature that is not there
    pub fn resolve(&self, dataset: &FeatureCollection, trigger: Option<LatLng>) -> Option<Camera> {
        match *self {
            CameraTarget::Fixed(camera) => Some(camera),
            CameraTarget::Trigger { zoom } => trigger.map(|center| Camera::new(center, zoom)),
            CameraTarget::DatasetFeature { index, zoom } => {
                let feature = dataset
                    .get(index)
                    .or_else(|| dataset.features.last())?;
                feature.anchor().map(|center| Camera::new(center, zoom))
            }
        }
    }
}

/// A titled legend derived from a layer's step expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

/// Everything one mode puts on the map
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSpec {
    /// Layers in draw order
    pub layers: Vec<LayerSpec>,
    /// Data bound to the shared source while the mode is active
    pub dataset: FeatureCollection,
    pub handlers: Vec<HandlerBinding>,
    pub camera: CameraTarget,
    /// Whether the home affordance is shown
    pub show_home: bool,
    pub legends: Vec<Legend>,
}

impl ModeSpec {
    pub fn new(dataset: FeatureCollection, camera: CameraTarget) -> Self {
        Self {
            layers: Vec::new(),
            dataset,
            handlers: Vec::new(),
            camera,
            show_home: false,
            legends: Vec::new(),
        }
    }

    pub fn layer(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn on(mut self, kind: InteractionKind, layer_id: &str, action: HandlerAction) -> Self {
        self.handlers.push(HandlerBinding::new(kind, layer_id, action));
        self
    }

    pub fn with_home(mut self) -> Self {
        self.show_home = true;
        self
    }

    pub fn legend(mut self, title: impl Into<String>, entries: Vec<LegendEntry>) -> Self {
        self.legends.push(Legend {
            title: title.into(),
            entries,
        });
        self
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.id.clone()).collect()
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.iter().any(|l| l.id == layer_id)
    }
}

/// How a demo returns home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeControl {
    /// Home button of the navigation control
    Navigation,
    /// Page back button
    BackButton,
    None,
}

/// A full demo: shared source plus one spec per mode
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSpec {
    pub name: String,
    pub options: DemoOptions,
    pub source_id: String,
    pub overview: ModeSpec,
    /// Demos without a second mode only act within the overview
    pub drill_down: Option<ModeSpec>,
    pub home: HomeControl,
    pub navigation: Option<NavigationConfig>,
    /// Page elements that must be present before the demo can start
    pub page_elements: Vec<PageElement>,
}

impl DemoSpec {
    pub fn mode_spec(&self, mode: Mode) -> Option<&ModeSpec> {
        match mode {
            Mode::Overview => Some(&self.overview),
            Mode::DrillDown => self.drill_down.as_ref(),
        }
    }
}

/// Mutable view state owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub mode: Mode,
    /// Bumped on every mode transition
    pub generation: u64,
    /// Set once the engine load handler has run
    pub ready: bool,
    pub legends_visible: bool,
    pub max_bounds: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::{Feature, Geometry, Properties};

    fn dataset() -> FeatureCollection {
        (0..3)
            .map(|i| {
                Feature::new(
                    Geometry::point(LatLng::new(30.0 + i as f64, -100.0)),
                    Properties::new(),
                )
            })
            .collect()
    }

    #[test]
    fn test_dataset_feature_target_falls_back_to_last() {
        let target = CameraTarget::DatasetFeature {
            index: 3000,
            zoom: 5.0,
        };
        let camera = target.resolve(&dataset(), None).unwrap();
        assert_eq!(camera.center, LatLng::new(32.0, -100.0));
        assert_eq!(camera.zoom, 5.0);
    }

    #[test]
    fn test_trigger_target_needs_trigger() {
        let target = CameraTarget::Trigger { zoom: 6.0 };
        assert!(target.resolve(&dataset(), None).is_none());
        let at = LatLng::new(36.7, -119.4);
        assert_eq!(target.resolve(&dataset(), Some(at)), Some(Camera::new(at, 6.0)));
    }

    #[test]
    fn test_empty_dataset_has_no_feature_target() {
        let target = CameraTarget::DatasetFeature { index: 0, zoom: 5.0 };
        assert!(target.resolve(&FeatureCollection::default(), None).is_none());
    }
}
