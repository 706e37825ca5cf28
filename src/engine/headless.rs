//! Deterministic in-memory map engine
//!
//! Keeps sources, layers, camera and handler registrations in plain data
//! structures and answers hit-tests with real geometry, so controllers can be
//! driven without a renderer. Camera moves complete instantly; the requested
//! transition style is only recorded.

use crate::prelude::{HashMap, HashSet};
use crate::{
    constants::{DEFAULT_VIEWPORT_SIZE, POINT_HIT_RADIUS},
    core::{
        config::TransitionStyle,
        geo::{LatLng, LatLngBounds, Point},
        viewport::{Camera, Viewport},
    },
    data::geojson::{Feature, FeatureCollection, Geometry},
    input::{
        events::{Cursor, InteractionEvent, InteractionKind},
        handler::HandlerRegistry,
    },
    layers::{base::LayerSpec, manager::LayerManager},
    spatial::{
        clustering::{ClusterIndex, ClusterOptions},
        index::{SpatialIndex, SpatialItem},
    },
    traits::{ControlPosition, ExpansionCallback, LoadCallback, MapEngine, SourceSpec},
    ui::{controls::ControlElement, popup::Popup},
    MapError, Result,
};
use geo::Contains;

/// One recorded camera change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    pub camera: Camera,
    pub style: TransitionStyle,
}

struct Source {
    data: FeatureCollection,
    clusters: Option<ClusterIndex>,
    /// Point features by position, for unclustered sources
    points: SpatialIndex<()>,
}

impl Source {
    fn new(spec: SourceSpec) -> Self {
        let mut source = Self {
            data: FeatureCollection::default(),
            clusters: None,
            points: SpatialIndex::new(),
        };
        source.rebuild(spec.data, spec.cluster);
        source
    }

    fn rebuild(&mut self, data: FeatureCollection, cluster: Option<ClusterOptions>) {
        let anchors: Vec<(usize, LatLng)> = data
            .iter()
            .enumerate()
            .filter_map(|(i, f)| match f.geometry {
                Geometry::Point { .. } => f.anchor().map(|a| (i, a)),
                _ => None,
            })
            .collect();

        self.clusters = cluster.map(|options| {
            ClusterIndex::new(options, anchors.iter().map(|(_, a)| *a).collect())
        });
        self.points = SpatialIndex::from_items(
            anchors
                .into_iter()
                .map(|(i, a)| SpatialItem::from_lat_lng(i, a, ()))
                .collect(),
        );
        self.data = data;
    }

    /// Features the source renders at `zoom`
    fn rendered(&self, zoom: f64) -> Vec<Feature> {
        match &self.clusters {
            Some(index) => {
                let points: Vec<Feature> = self
                    .data
                    .iter()
                    .filter(|f| matches!(f.geometry, Geometry::Point { .. }))
                    .cloned()
                    .collect();
                index
                    .nodes_at(zoom)
                    .iter()
                    .filter_map(|node| ClusterIndex::node_feature(node, &points))
                    .collect()
            }
            None => self.data.features.clone(),
        }
    }
}

/// In-memory [`MapEngine`]
pub struct HeadlessEngine {
    viewport: Viewport,
    loaded: bool,
    load_callbacks: Vec<LoadCallback>,
    sources: HashMap<String, Source>,
    layers: LayerManager,
    handlers: HandlerRegistry,
    hovered: HashSet<String>,
    cursor: Cursor,
    popup: Option<Popup>,
    controls: Vec<(ControlElement, ControlPosition)>,
    camera_log: Vec<CameraMove>,
    defer_callbacks: bool,
    deferred: Vec<Box<dyn FnOnce() + Send>>,
    hit_radius: f64,
}

impl HeadlessEngine {
    pub fn new(camera: Camera, size: Point) -> Self {
        Self {
            viewport: Viewport::new(camera.center, camera.zoom, size),
            loaded: false,
            load_callbacks: Vec::new(),
            sources: HashMap::default(),
            layers: LayerManager::new(),
            handlers: HandlerRegistry::new(),
            hovered: HashSet::default(),
            cursor: Cursor::Default,
            popup: None,
            controls: Vec::new(),
            camera_log: Vec::new(),
            defer_callbacks: false,
            deferred: Vec::new(),
            hit_radius: POINT_HIT_RADIUS,
        }
    }

    /// An engine that has already finished loading
    pub fn loaded(camera: Camera) -> Self {
        let mut engine = Self::new(camera, default_size());
        engine.finish_loading();
        engine
    }

    pub fn with_hit_radius(mut self, radius: f64) -> Self {
        self.hit_radius = radius;
        self
    }

    /// Marks the engine loaded and fires the queued load callbacks
    pub fn finish_loading(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        #[cfg(feature = "debug")]
        log::info!("engine loaded, {} load callbacks", self.load_callbacks.len());
        for callback in std::mem::take(&mut self.load_callbacks) {
            self.run(callback);
        }
    }

    /// Holds callbacks until [`flush_callbacks`](Self::flush_callbacks) instead of running them inline
    pub fn set_defer_callbacks(&mut self, defer: bool) {
        self.defer_callbacks = defer;
    }

    /// Runs every held callback; returns how many ran
    pub fn flush_callbacks(&mut self) -> usize {
        let pending = std::mem::take(&mut self.deferred);
        let count = pending.len();
        for callback in pending {
            callback();
        }
        count
    }

    fn run(&mut self, callback: Box<dyn FnOnce() + Send>) {
        if self.defer_callbacks {
            self.deferred.push(callback);
        } else {
            callback();
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Resizes the container; the camera center stays in the middle
    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    pub fn source_data(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id).map(|s| &s.data)
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.get_layer(id)
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn control(&self, id: &str) -> Option<&ControlElement> {
        self.controls.iter().find(|(c, _)| c.id == id).map(|(c, _)| c)
    }

    pub fn camera_log(&self) -> &[CameraMove] {
        &self.camera_log
    }

    pub fn max_bounds(&self) -> Option<&LatLngBounds> {
        self.viewport.max_bounds()
    }

    pub fn is_registered(&self, kind: InteractionKind, layer_id: &str) -> bool {
        self.handlers.is_registered(kind, layer_id)
    }

    /// Container pixel of a geographic position under the current camera
    pub fn pixel_of(&self, lat_lng: &LatLng) -> Point {
        self.viewport.lat_lng_to_pixel(lat_lng)
    }

    /// Features a layer draws at the current zoom
    pub fn rendered_features(&self, layer_id: &str) -> Vec<Feature> {
        let Some(layer) = self.layers.get_layer(layer_id) else {
            return Vec::new();
        };
        let Some(source) = self.sources.get(&layer.source) else {
            return Vec::new();
        };
        source
            .rendered(self.viewport.zoom)
            .into_iter()
            .filter(|f| layer.accepts(f))
            .collect()
    }

    fn hits(&self, layer: &LayerSpec, point: &Point) -> Vec<Feature> {
        let Some(source) = self.sources.get(&layer.source) else {
            return Vec::new();
        };
        let lng_lat = self.viewport.pixel_to_lat_lng(point);
        let geo_point = geo::Point::new(lng_lat.lng, lng_lat.lat);

        let candidates: Vec<Feature> = match &source.clusters {
            Some(_) => source.rendered(self.viewport.zoom),
            None => {
                // Points come from the index, everything else is tested directly
                let window = self.viewport.pixel_radius_bounds(point, self.hit_radius);
                let near: HashSet<usize> =
                    source.points.query(&window).iter().map(|item| item.id).collect();
                source
                    .data
                    .iter()
                    .enumerate()
                    .filter(|(i, f)| {
                        !matches!(f.geometry, Geometry::Point { .. }) || near.contains(i)
                    })
                    .map(|(_, f)| f.clone())
                    .collect()
            }
        };

        let mut hits: Vec<Feature> = candidates
            .into_iter()
            .filter(|f| layer.accepts(f))
            .filter(|f| match &f.geometry {
                Geometry::Point { coordinates } => {
                    let pixel = self.viewport.lat_lng_to_pixel(&LatLng::from_lng_lat(*coordinates));
                    pixel.distance_to(point) <= self.hit_radius
                }
                Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => {
                    match f.geometry.to_geo() {
                        geo_types::Geometry::Polygon(polygon) => polygon.contains(&geo_point),
                        geo_types::Geometry::MultiPolygon(multi) => multi.contains(&geo_point),
                        _ => false,
                    }
                }
                _ => false,
            })
            .collect();
        hits.reverse();
        hits
    }

    /// Reports a click at a container pixel to every layer registered for clicks
    pub fn click(&self, point: Point) -> Vec<InteractionEvent> {
        let lng_lat = self.viewport.pixel_to_lat_lng(&point);
        self.registered_top_down(InteractionKind::Click)
            .into_iter()
            .filter_map(|layer_id| {
                let features = self.query_rendered_features(point, &[layer_id.as_str()]);
                (!features.is_empty()).then(|| {
                    InteractionEvent::new(InteractionKind::Click, layer_id, point, lng_lat)
                        .with_features(features)
                })
            })
            .collect()
    }

    /// Moves the pointer; reports enter, move and leave per registered layer
    pub fn pointer_move(&mut self, point: Point) -> Vec<InteractionEvent> {
        let lng_lat = self.viewport.pixel_to_lat_lng(&point);
        let mut events = Vec::new();

        for layer_id in self.layers.list_layers().into_iter().rev() {
            let features = self.query_rendered_features(point, &[layer_id.as_str()]);
            let was_hovered = self.hovered.contains(&layer_id);

            if features.is_empty() {
                if was_hovered {
                    self.hovered.remove(&layer_id);
                    if self.handlers.is_registered(InteractionKind::MouseLeave, &layer_id) {
                        events.push(InteractionEvent::new(
                            InteractionKind::MouseLeave,
                            layer_id.as_str(),
                            point,
                            lng_lat,
                        ));
                    }
                }
                continue;
            }

            if !was_hovered {
                self.hovered.insert(layer_id.clone());
                if self.handlers.is_registered(InteractionKind::MouseEnter, &layer_id) {
                    events.push(
                        InteractionEvent::new(InteractionKind::MouseEnter, layer_id.as_str(), point, lng_lat)
                            .with_features(features.clone()),
                    );
                }
            }
            if self.handlers.is_registered(InteractionKind::MouseMove, &layer_id) {
                events.push(
                    InteractionEvent::new(InteractionKind::MouseMove, layer_id.as_str(), point, lng_lat)
                        .with_features(features),
                );
            }
        }

        events
    }

    fn registered_top_down(&self, kind: InteractionKind) -> Vec<String> {
        let registered = self.handlers.layers_for(kind);
        self.layers
            .list_layers()
            .into_iter()
            .rev()
            .filter(|id| registered.contains(id))
            .collect()
    }

    fn record_camera(&mut self, style: TransitionStyle) {
        self.camera_log.push(CameraMove {
            camera: self.viewport.camera(),
            style,
        });
    }
}

fn default_size() -> Point {
    Point::new(DEFAULT_VIEWPORT_SIZE.0, DEFAULT_VIEWPORT_SIZE.1)
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new(Camera::new(LatLng::default(), 0.0), default_size())
    }
}

impl MapEngine for HeadlessEngine {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn on_load(&mut self, callback: LoadCallback) {
        if self.loaded {
            self.run(callback);
        } else {
            self.load_callbacks.push(callback);
        }
    }

    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<()> {
        if self.sources.contains_key(id) {
            return Err(MapError::Source(format!("source '{}' already exists", id)));
        }
        self.sources.insert(id.to_string(), Source::new(source));
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<()> {
        if self.layers.layers_for_source(id).next().is_some() {
            return Err(MapError::Source(format!("source '{}' is in use", id)));
        }
        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapError::Source(format!("source '{}' does not exist", id)))
    }

    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<()> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| MapError::Source(format!("source '{}' does not exist", id)))?;
        let options = source.clusters.as_ref().map(|c| *c.options());
        source.rebuild(data.clone(), options);
        Ok(())
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()> {
        if !self.sources.contains_key(&layer.source) {
            return Err(MapError::Layer(format!(
                "layer '{}' references missing source '{}'",
                layer.id, layer.source
            )));
        }
        self.layers.add_layer(layer.clone())
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        self.layers.remove_layer(id)?;
        self.hovered.remove(id);
        Ok(())
    }

    fn layer_ids(&self) -> Vec<String> {
        self.layers.list_layers()
    }

    fn query_rendered_features(&self, point: Point, layer_ids: &[&str]) -> Vec<Feature> {
        self.layers
            .layers()
            .into_iter()
            .rev()
            .filter(|layer| layer_ids.is_empty() || layer_ids.contains(&layer.id.as_str()))
            .flat_map(|layer| self.hits(layer, &point))
            .collect()
    }

    fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    fn move_camera(&mut self, target: Camera, style: TransitionStyle) {
        self.viewport.set_camera(target);
        self.record_camera(style);
    }

    fn zoom_by(&mut self, delta: f64) {
        let zoom = self.viewport.zoom + delta;
        self.viewport.set_zoom(zoom);
        self.record_camera(TransitionStyle::Ease);
    }

    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) {
        self.viewport.set_max_bounds(bounds);
    }

    fn on(&mut self, kind: InteractionKind, layer_id: &str) {
        self.handlers.register(kind, layer_id, ());
    }

    fn off(&mut self, kind: InteractionKind, layer_id: &str) {
        self.handlers.deregister(kind, layer_id);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn cluster_expansion_zoom(&mut self, source_id: &str, cluster_id: u64, callback: ExpansionCallback) {
        let result = match self.sources.get(source_id) {
            Some(Source {
                clusters: Some(index),
                ..
            }) => index.expansion_zoom(cluster_id),
            Some(_) => Err(MapError::Source(format!(
                "source '{}' is not clustered",
                source_id
            ))),
            None => Err(MapError::Source(format!(
                "source '{}' does not exist",
                source_id
            ))),
        };
        self.run(Box::new(move || callback(result)));
    }

    fn show_popup(&mut self, popup: &Popup) {
        self.popup = Some(popup.clone());
    }

    fn remove_popup(&mut self) {
        self.popup = None;
    }

    fn add_control(&mut self, root: &ControlElement, position: ControlPosition) {
        match self.controls.iter_mut().find(|(c, _)| c.id == root.id) {
            Some(slot) => *slot = (root.clone(), position),
            None => self.controls.push((root.clone(), position)),
        }
    }

    fn remove_control(&mut self, control_id: &str) {
        self.controls.retain(|(c, _)| c.id != control_id);
    }
}
