pub mod clustering;
pub mod index;

pub use clustering::{ClusterIndex, ClusterNode, ClusterOptions};
pub use index::{SpatialIndex, SpatialItem};
