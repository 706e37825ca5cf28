use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

fn world_size(zoom: f64) -> f64 {
    256.0 * 2_f64.powf(zoom)
}

/// Camera position: center and zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: LatLng,
    pub zoom: f64,
}

impl Camera {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// What the headless engine is looking at, plus the container size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Panning limit, when set
    max_bounds: Option<LatLngBounds>,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 22.0),
            size,
            min_zoom: 0.0,
            max_zoom: 22.0,
            max_bounds: None,
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.center, self.zoom)
    }

    /// Sets center and zoom in one step
    pub fn set_camera(&mut self, camera: Camera) {
        self.set_zoom(camera.zoom);
        self.set_center(camera.center);
    }

    /// Sets the maximum bounds; the current center is pulled inside them
    pub fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) {
        self.max_bounds = bounds;
        self.center = self.clamp_center(self.center);
    }

    pub fn max_bounds(&self) -> Option<&LatLngBounds> {
        self.max_bounds.as_ref()
    }

    /// Moves the center, kept inside the max bounds
    pub fn set_center(&mut self, center: LatLng) {
        self.center = self.clamp_center(center);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    fn clamp_center(&self, center: LatLng) -> LatLng {
        match &self.max_bounds {
            Some(bounds) => bounds.clamp(&center),
            None => center,
        }
    }

    /// Web Mercator world pixel at `zoom`, 256px tiles
    pub fn project_at(lat_lng: &LatLng, zoom: f64) -> Point {
        let scale = world_size(zoom);
        let lat = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * scale;
        Point::new(x, y)
    }

    pub fn unproject_at(pixel: &Point, zoom: f64) -> LatLng {
        let scale = world_size(zoom);
        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / scale);
        LatLng::new(n.sinh().atan().to_degrees(), lng)
    }

    fn half_size(&self) -> Point {
        Point::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    /// Container pixel of a coordinate under the current camera
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = Self::project_at(&self.center, self.zoom);
        Self::project_at(lat_lng, self.zoom)
            .subtract(&origin)
            .add(&self.half_size())
    }

    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = Self::project_at(&self.center, self.zoom);
        let world = pixel.subtract(&self.half_size()).add(&origin);
        Self::unproject_at(&world, self.zoom)
    }

    /// Geographic box covering a square of `radius` pixels around `pixel`
    pub fn pixel_radius_bounds(&self, pixel: &Point, radius: f64) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(pixel.x - radius, pixel.y - radius));
        let se = self.pixel_to_lat_lng(&Point::new(pixel.x + radius, pixel.y + radius));
        LatLngBounds::from_coords(se.lat, nw.lng, nw.lat, se.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(38.907, -100.04), 4.0, Point::new(1024.0, 768.0))
    }

    #[test]
    fn test_center_projects_to_middle() {
        let vp = viewport();
        let pixel = vp.lat_lng_to_pixel(&vp.center);
        assert!((pixel.x - 512.0).abs() < 1e-6);
        assert!((pixel.y - 384.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_round_trip() {
        let vp = viewport();
        let target = LatLng::new(36.7, -119.4);
        let back = vp.pixel_to_lat_lng(&vp.lat_lng_to_pixel(&target));
        assert!((back.lat - target.lat).abs() < 1e-6);
        assert!((back.lng - target.lng).abs() < 1e-6);
    }

    #[test]
    fn test_project_known_values() {
        let origin = Viewport::project_at(&LatLng::new(0.0, 0.0), 0.0);
        assert!((origin.x - 128.0).abs() < 1e-9);
        assert!((origin.y - 128.0).abs() < 1e-9);

        let corner = Viewport::project_at(&LatLng::new(0.0, -180.0), 2.0);
        assert!(corner.x.abs() < 1e-9);
        assert!((corner.y - 512.0).abs() < 1e-9);

        let back = Viewport::unproject_at(&Viewport::project_at(&LatLng::new(60.0, 30.0), 5.0), 5.0);
        assert!((back.lat - 60.0).abs() < 1e-9);
        assert!((back.lng - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_bounds_clamps_center() {
        let mut vp = viewport();
        vp.set_max_bounds(Some(LatLngBounds::from_coords(23.0, -127.0, 50.0, -61.0)));
        vp.set_center(LatLng::new(10.0, 0.0));
        assert_eq!(vp.center, LatLng::new(23.0, -61.0));

        vp.set_max_bounds(None);
        vp.set_center(LatLng::new(10.0, 0.0));
        assert_eq!(vp.center, LatLng::new(10.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = viewport();
        vp.set_zoom(40.0);
        assert_eq!(vp.zoom, vp.max_zoom);
        vp.set_zoom(-3.0);
        assert_eq!(vp.zoom, 0.0);
    }
}
