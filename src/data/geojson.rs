use crate::core::{
    config::RandomValueConfig,
    geo::{LatLng, LatLngBounds},
};
use crate::{MapError, Result};
use geo_types::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Property bag of a feature
pub type Properties = serde_json::Map<String, Value>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

/// Coarse geometry class, as used by layer filters (`$type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl Geometry {
    pub fn point(position: LatLng) -> Self {
        Self::Point {
            coordinates: position.to_lng_lat(),
        }
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point { .. } | Self::MultiPoint { .. } => GeometryType::Point,
            Self::LineString { .. } | Self::MultiLineString { .. } => GeometryType::LineString,
            Self::Polygon { .. } | Self::MultiPolygon { .. } => GeometryType::Polygon,
        }
    }

    /// Every position of the geometry, outer rings and holes included
    pub fn positions(&self) -> Vec<[f64; 2]> {
        match self {
            Self::Point { coordinates } => vec![*coordinates],
            Self::LineString { coordinates } | Self::MultiPoint { coordinates } => {
                coordinates.clone()
            }
            Self::Polygon { coordinates } | Self::MultiLineString { coordinates } => {
                coordinates.iter().flatten().copied().collect()
            }
            Self::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().copied().collect()
            }
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        let positions = self.positions();
        let first = LatLng::from_lng_lat(*positions.first()?);
        let mut bounds = LatLngBounds::new(first, first);
        for position in &positions[1..] {
            bounds.extend(&LatLng::from_lng_lat(*position));
        }
        Some(bounds)
    }

    /// Converts to a `geo` geometry for spatial predicates
    pub fn to_geo(&self) -> geo_types::Geometry<f64> {
        fn coord(position: &[f64; 2]) -> Coord<f64> {
            Coord {
                x: position[0],
                y: position[1],
            }
        }
        fn line(ring: &[[f64; 2]]) -> LineString<f64> {
            LineString::new(ring.iter().map(coord).collect())
        }
        fn polygon(rings: &[Vec<[f64; 2]>]) -> Polygon<f64> {
            match rings.split_first() {
                Some((exterior, holes)) => {
                    Polygon::new(line(exterior), holes.iter().map(|h| line(h)).collect())
                }
                None => Polygon::new(LineString::new(Vec::new()), Vec::new()),
            }
        }

        match self {
            Self::Point { coordinates } => geo_types::Point::from(coord(coordinates)).into(),
            Self::LineString { coordinates } => line(coordinates).into(),
            Self::Polygon { coordinates } => polygon(coordinates).into(),
            Self::MultiPoint { coordinates } => MultiPoint::new(
                coordinates
                    .iter()
                    .map(|c| geo_types::Point::from(coord(c)))
                    .collect(),
            )
            .into(),
            Self::MultiLineString { coordinates } => {
                MultiLineString::new(coordinates.iter().map(|l| line(l)).collect()).into()
            }
            Self::MultiPolygon { coordinates } => {
                MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()).into()
            }
        }
    }
}

/// One geographic record: geometry plus a property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Numeric property; numeric strings are accepted
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.property(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Property rendered for display; strings are shown without quotes
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.property(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// The feature's own location: the point itself, or the bounds center
    pub fn anchor(&self) -> Option<LatLng> {
        match &self.geometry {
            Geometry::Point { coordinates } => Some(LatLng::from_lng_lat(*coordinates)),
            other => other.bounds().map(|b| b.center()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Parses either a GeoJSON object or a `geoResult.data` wrapper
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        if value.get("geoResult").is_some() {
            let wrapper: GeoResult = serde_json::from_value(value)
                .map_err(|e| MapError::ParseError(format!("Invalid geoResult: {}", e)))?;
            let collection = wrapper.into_collection();
            collection.validate()?;
            return Ok(collection);
        }

        let geojson: GeoJson = serde_json::from_value(value)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))?;
        let collection = match geojson {
            GeoJson::Feature(feature) => Self::new(vec![feature]),
            GeoJson::FeatureCollection(collection) => collection,
        };
        collection.validate()?;
        Ok(collection)
    }

    /// Rejects positions that cannot be placed on the map
    pub fn validate(&self) -> Result<()> {
        for (i, feature) in self.features.iter().enumerate() {
            let bad = feature
                .geometry
                .positions()
                .into_iter()
                .find(|p| !LatLng::from_lng_lat(*p).is_plottable());
            if let Some([lng, lat]) = bad {
                return Err(MapError::InvalidCoordinates(format!(
                    "feature {} has position [{}, {}]",
                    i, lng, lat
                )));
            }
        }
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_geojson(&self) -> Result<Value> {
        Ok(serde_json::to_value(GeoJson::FeatureCollection(
            self.clone(),
        ))?)
    }

    /// Assigns every feature a rounded random `value` in `[min, max)`
    pub fn assign_random_values(&mut self, config: &RandomValueConfig) {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for feature in &mut self.features {
            let value = (rng.gen::<f64>() * (config.max - config.min) + config.min).round();
            feature
                .properties
                .insert("value".to_string(), Value::from(value as i64));
        }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Wrapper format used by the polygon and pushpin fixtures
#[derive(Debug, Clone, Deserialize)]
pub struct GeoResult {
    #[serde(rename = "geoResult")]
    pub geo_result: GeoResultData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoResultData {
    #[serde(default)]
    pub data: Vec<GeoResultRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoResultRecord {
    pub geometry: Geometry,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub element: Option<Value>,
}

impl GeoResult {
    pub fn into_collection(self) -> FeatureCollection {
        self.geo_result
            .data
            .into_iter()
            .map(|record| {
                let mut properties = Properties::new();
                for (key, value) in [
                    ("title", record.title),
                    ("value", record.value),
                    ("element", record.element),
                ] {
                    if let Some(value) = value {
                        properties.insert(key.to_string(), value);
                    }
                }
                Feature::new(record.geometry, properties)
            })
            .collect()
    }
}
