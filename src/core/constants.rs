//! Demo-wide constants shared by the presets in `core::config`.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Overview framing of the polygon demo, `[lng, lat]`.
pub const US_CENTER: [f64; 2] = [-100.04, 38.907];

/// Overview zoom of the polygon demo.
pub const US_ZOOM: f64 = 4.0;

/// Zoom the polygon demo flies to when a state is clicked.
pub const COUNTY_ZOOM: f64 = 6.0;

/// Overview framing of the marker demo, `[lng, lat]`.
pub const MARKER_CENTER: [f64; 2] = [-98.657227, 40.097134];

/// Overview zoom of the marker demo; also restored when max bounds are lifted.
pub const STATE_ZOOM: f64 = 3.0;

/// Zoom used when flying to a single marker or a wifi listing.
pub const MARKER_ZOOM: f64 = 10.0;

/// Initial zoom of the zooming and clustering demos.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Max bounds applied by the bound-viewport checkbox, `[[west, south], [east, north]]`.
pub const US_BOUNDS: [[f64; 2]; 2] = [[-127.177734, 23.781965], [-61.171875, 50.567563]];

/// Range of the randomly assigned `value` magnitude.
pub const RANDOM_VALUE_MIN: f64 = 10.0;
pub const RANDOM_VALUE_MAX: f64 = 1000.0;

/// Clustering defaults.
pub const CLUSTER_MAX_ZOOM: u8 = 14;
pub const CLUSTER_RADIUS: f64 = 50.0;

/// Index of the wifi listing the marker demo flies to on drill-down.
pub const WIFI_FOCUS_INDEX: usize = 10;

/// Index of the pushpin the clustering demo centers on at load.
pub const PUSHPIN_FOCUS_INDEX: usize = 3000;

/// Pixel tolerance for hit-testing point features.
pub const POINT_HIT_RADIUS: f64 = 10.0;

/// Programmatic +/- zoom step of the navigation control.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Default viewport size used by the headless engine.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (1024.0, 768.0);
