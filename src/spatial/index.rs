use crate::core::geo::{LatLng, LatLngBounds};

use rstar::{RTree, RTreeObject, AABB};

/// A spatial item indexed by its geographic envelope (x = lng, y = lat)
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: usize,
    pub bounds: LatLngBounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: usize, bounds: LatLngBounds, data: T) -> Self {
        Self { id, bounds, data }
    }

    pub fn from_lat_lng(id: usize, lat_lng: LatLng, data: T) -> Self {
        Self::new(id, LatLngBounds::new(lat_lng, lat_lng), data)
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

fn envelope_of(bounds: &LatLngBounds) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.south_west.lng, bounds.south_west.lat],
        [bounds.north_east.lng, bounds.north_east.lat],
    )
}

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope_of(&self.bounds)
    }
}

/// R-tree over feature envelopes
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
        }
    }

    /// Bulk-loads a fresh index
    pub fn from_items(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    /// Items whose envelope intersects `bounds`, ordered by id
    pub fn query(&self, bounds: &LatLngBounds) -> Vec<&SpatialItem<T>> {
        let mut items: Vec<_> = self
            .rtree
            .locate_in_envelope_intersecting(&envelope_of(bounds))
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
