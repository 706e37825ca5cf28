use serde::{Deserialize, Serialize};

/// Web Mercator cuts off here
const MERCATOR_LAT_LIMIT: f64 = 85.0511287798;

/// Geographic position, degrees
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from a GeoJSON `[lng, lat]` pair
    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON ordering, `[lng, lat]`
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Finite, with latitude on the globe. Longitude may run past ±180
    /// for shapes that cross the antimeridian.
    pub fn is_plottable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.lat.abs() <= 90.0
    }

    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MERCATOR_LAT_LIMIT, MERCATOR_LAT_LIMIT)
    }

    /// Returns the copy of this coordinate (shifted by whole turns of 360°)
    /// whose longitude lies within 180° of `reference`.
    ///
    /// The result may fall outside [-180, 180]; the engine then draws it on
    /// the world copy nearest to `reference`.
    pub fn nearest_copy_to(&self, reference: &LatLng) -> LatLng {
        let gap = reference.lng - self.lng;
        if gap.abs() <= 180.0 {
            return *self;
        }
        // Fewest whole turns that bring the gap within 180°
        let turns = ((gap.abs() - 180.0) / 360.0).ceil();
        LatLng::new(self.lat, self.lng + gap.signum() * turns * 360.0)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(position: [f64; 2]) -> Self {
        Self::from_lng_lat(position)
    }
}

/// Pixel position, either in the container or in world space
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, offset: &Point) -> Point {
        Point::new(self.x + offset.x, self.y + offset.y)
    }

    pub fn subtract(&self, offset: &Point) -> Point {
        Point::new(self.x - offset.x, self.y - offset.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box, south-west and north-east corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Two GeoJSON `[lng, lat]` corners, south-west first
    pub fn from_lng_lat_pairs(south_west: [f64; 2], north_east: [f64; 2]) -> Self {
        Self::new(
            LatLng::from_lng_lat(south_west),
            LatLng::from_lng_lat(north_east),
        )
    }

    pub fn contains(&self, position: &LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&position.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&position.lng)
    }

    /// Grows the box until it covers `position`
    pub fn extend(&mut self, position: &LatLng) {
        let (sw, ne) = (&mut self.south_west, &mut self.north_east);
        sw.lat = sw.lat.min(position.lat);
        sw.lng = sw.lng.min(position.lng);
        ne.lat = ne.lat.max(position.lat);
        ne.lng = ne.lng.max(position.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            0.5 * (self.south_west.lat + self.north_east.lat),
            0.5 * (self.south_west.lng + self.north_east.lng),
        )
    }

    /// Nearest position inside the box
    pub fn clamp(&self, position: &LatLng) -> LatLng {
        LatLng::new(
            position.lat.clamp(self.south_west.lat, self.north_east.lat),
            position.lng.clamp(self.south_west.lng, self.north_east.lng),
        )
    }
}
