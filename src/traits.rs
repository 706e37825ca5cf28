//! Seams between the controller and the rendering engine
//!
//! The engine itself (rendering, tiling, projection, expression evaluation)
//! lives behind [`MapEngine`]. Controls plug into the engine through
//! [`MapControl`].

use crate::{
    core::{
        config::TransitionStyle,
        geo::{LatLngBounds, Point},
        viewport::Camera,
    },
    data::geojson::{Feature, FeatureCollection},
    input::events::{Cursor, InteractionKind},
    layers::base::LayerSpec,
    spatial::clustering::ClusterOptions,
    ui::{controls::ControlElement, popup::Popup},
    Result,
};
use serde::{Deserialize, Serialize};

/// Completion callback of a cluster expansion-zoom lookup
pub type ExpansionCallback = Box<dyn FnOnce(Result<f64>) + Send>;

/// Fired once when the engine has finished its initial load
pub type LoadCallback = Box<dyn FnOnce() + Send>;

/// A GeoJSON source registration
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub data: FeatureCollection,
    pub cluster: Option<ClusterOptions>,
}

impl SourceSpec {
    pub fn geojson(data: FeatureCollection) -> Self {
        Self {
            data,
            cluster: None,
        }
    }

    pub fn clustered(data: FeatureCollection, options: ClusterOptions) -> Self {
        Self {
            data,
            cluster: Some(options),
        }
    }
}

/// Corner a control is mounted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Rendering engine API surface the controller consumes
pub trait MapEngine {
    fn is_loaded(&self) -> bool;

    /// Queues `callback` for the end of the initial load; fires at once if already loaded
    fn on_load(&mut self, callback: LoadCallback);

    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<()>;

    fn remove_source(&mut self, id: &str) -> Result<()>;

    /// Rebinds an existing source to new data
    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<()>;

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()>;

    fn remove_layer(&mut self, id: &str) -> Result<()>;

    /// Attached layer ids in draw order
    fn layer_ids(&self) -> Vec<String>;

    /// Features drawn by `layer_ids` under a container pixel, topmost first
    fn query_rendered_features(&self, point: Point, layer_ids: &[&str]) -> Vec<Feature>;

    fn camera(&self) -> Camera;

    fn move_camera(&mut self, target: Camera, style: TransitionStyle);

    fn zoom_by(&mut self, delta: f64);

    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>);

    /// Starts reporting `kind` events for `layer_id`
    fn on(&mut self, kind: InteractionKind, layer_id: &str);

    /// Stops reporting `kind` events for `layer_id`
    fn off(&mut self, kind: InteractionKind, layer_id: &str);

    fn set_cursor(&mut self, cursor: Cursor);

    fn cursor(&self) -> Cursor;

    fn cluster_expansion_zoom(
        &mut self,
        source_id: &str,
        cluster_id: u64,
        callback: ExpansionCallback,
    );

    fn show_popup(&mut self, popup: &Popup);

    fn remove_popup(&mut self);

    /// Mounts a control root in a corner
    fn add_control(&mut self, root: &ControlElement, position: ControlPosition);

    fn remove_control(&mut self, control_id: &str);
}

/// Control extension point exposed to the engine
pub trait MapControl {
    /// Called when the control is added; returns its root element
    fn on_add(&mut self, engine: &mut dyn MapEngine) -> &ControlElement;

    /// Called when the control is removed
    fn on_remove(&mut self, engine: &mut dyn MapEngine);
}
