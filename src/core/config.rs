//! Configuration system for the demo controllers
//!
//! Each demo resolves a [`DemoProfile`] preset into [`DemoOptions`]. Options
//! are plain serde structs, so a custom profile can be loaded from JSON.

use crate::{
    constants::{
        CLUSTER_MAX_ZOOM, CLUSTER_RADIUS, COUNTY_ZOOM, DEFAULT_ZOOM, MARKER_CENTER, MARKER_ZOOM,
        POINT_HIT_RADIUS, PUSHPIN_FOCUS_INDEX, RANDOM_VALUE_MAX, RANDOM_VALUE_MIN, STATE_ZOOM,
        US_BOUNDS, US_CENTER, US_ZOOM, WIFI_FOCUS_INDEX,
    },
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::Camera,
    },
    spatial::clustering::ClusterOptions,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum DemoProfile {
    Polygon,
    Zooming,
    Markers,
    Clustering,
    Custom(DemoOptions),
}

impl DemoProfile {
    pub fn resolve(&self) -> DemoOptions {
        match self {
            Self::Polygon => DemoOptions {
                camera: CameraConfig::new(US_CENTER, US_ZOOM),
                drill_down: DrillDownConfig {
                    zoom: COUNTY_ZOOM,
                    focus_index: None,
                },
                interaction: InteractionConfig::default(),
                max_bounds: None,
                clustering: None,
                values: None,
            },
            Self::Zooming => DemoOptions {
                camera: CameraConfig::new(US_CENTER, DEFAULT_ZOOM),
                drill_down: DrillDownConfig {
                    zoom: MARKER_ZOOM,
                    focus_index: None,
                },
                interaction: InteractionConfig::default(),
                max_bounds: None,
                clustering: None,
                values: Some(RandomValueConfig::default()),
            },
            Self::Markers => DemoOptions {
                camera: CameraConfig::new(MARKER_CENTER, STATE_ZOOM),
                drill_down: DrillDownConfig {
                    zoom: MARKER_ZOOM,
                    focus_index: Some(WIFI_FOCUS_INDEX),
                },
                interaction: InteractionConfig::default(),
                max_bounds: Some(US_BOUNDS),
                clustering: None,
                values: Some(RandomValueConfig::default()),
            },
            Self::Clustering => DemoOptions {
                camera: CameraConfig::new(US_CENTER, DEFAULT_ZOOM).focused_on(PUSHPIN_FOCUS_INDEX),
                drill_down: DrillDownConfig {
                    zoom: MARKER_ZOOM,
                    focus_index: None,
                },
                interaction: InteractionConfig {
                    transition: TransitionStyle::Ease,
                    ..InteractionConfig::default()
                },
                max_bounds: None,
                clustering: Some(ClusterOptions {
                    max_zoom: CLUSTER_MAX_ZOOM,
                    radius: CLUSTER_RADIUS,
                }),
                values: None,
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for DemoProfile {
    fn default() -> Self {
        Self::Polygon
    }
}

/// Resolved demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoOptions {
    /// Overview framing, restored on return to overview
    pub camera: CameraConfig,
    pub drill_down: DrillDownConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    /// `[[west, south], [east, north]]` applied by the max-bounds toggle
    #[serde(default)]
    pub max_bounds: Option<[[f64; 2]; 2]>,
    #[serde(default)]
    pub clustering: Option<ClusterOptions>,
    /// Randomly assigned `value` magnitudes; `None` keeps fixture values
    #[serde(default)]
    pub values: Option<RandomValueConfig>,
}

impl DemoOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| MapError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn max_bounds(&self) -> Option<LatLngBounds> {
        self.max_bounds
            .map(|[south_west, north_east]| LatLngBounds::from_lng_lat_pairs(south_west, north_east))
    }
}

impl Default for DemoOptions {
    fn default() -> Self {
        DemoProfile::default().resolve()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// `[lng, lat]`
    pub center: [f64; 2],
    pub zoom: f64,
    /// Overview feature to center on once loaded, instead of `center`
    #[serde(default)]
    pub focus_index: Option<usize>,
}

impl CameraConfig {
    pub fn new(center: [f64; 2], zoom: f64) -> Self {
        Self {
            center,
            zoom,
            focus_index: None,
        }
    }

    pub fn focused_on(mut self, index: usize) -> Self {
        self.focus_index = Some(index);
        self
    }

    pub fn to_camera(&self) -> Camera {
        Camera::new(LatLng::from_lng_lat(self.center), self.zoom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillDownConfig {
    pub zoom: f64,
    /// Fixed feature of the drill-down dataset to fly to, instead of the trigger
    #[serde(default)]
    pub focus_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub transition: TransitionStyle,
    /// Pixel tolerance for point hit-testing
    pub hit_radius: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            transition: TransitionStyle::Fly,
            hit_radius: POINT_HIT_RADIUS,
        }
    }
}

/// How the camera moves to a new target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    Fly,
    Ease,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomValueConfig {
    pub min: f64,
    pub max: f64,
    /// Fixed seed for reproducible magnitudes
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RandomValueConfig {
    fn default() -> Self {
        Self {
            min: RANDOM_VALUE_MIN,
            max: RANDOM_VALUE_MAX,
            seed: None,
        }
    }
}
