//! Grid-based point clustering for clustered sources.
//!
//! Points are bucketed into `radius`-pixel cells of the world pixel grid at
//! each integer zoom. Cells holding two or more points become clusters with
//! a stable id; the expansion zoom of a cluster is the first deeper zoom at
//! which its points no longer share one cell.

use crate::prelude::HashMap;
use crate::{
    core::{geo::LatLng, viewport::Viewport},
    data::geojson::{Feature, Geometry, Properties},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source-level clustering options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    /// Deepest zoom at which points are still clustered
    pub max_zoom: u8,
    /// Cluster radius in pixels
    pub radius: f64,
}

/// One rendered node at a zoom level: a cluster or a lone point
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    /// `None` for lone points
    pub id: Option<u64>,
    pub center: LatLng,
    /// Indices into the indexed point list
    pub members: Vec<usize>,
}

impl ClusterNode {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_cluster(&self) -> bool {
        self.id.is_some()
    }
}

struct ZoomLevel {
    nodes: Vec<ClusterNode>,
    /// Point index -> node index
    node_of: Vec<usize>,
}

/// Cluster hierarchy over a fixed set of points
pub struct ClusterIndex {
    options: ClusterOptions,
    points: Vec<LatLng>,
    levels: HashMap<u8, ZoomLevel>,
    /// Cluster id -> zoom it was created at
    cluster_zoom: HashMap<u64, u8>,
}

impl ClusterIndex {
    pub fn new(options: ClusterOptions, points: Vec<LatLng>) -> Self {
        let mut index = Self {
            options,
            points,
            levels: HashMap::default(),
            cluster_zoom: HashMap::default(),
        };
        for zoom in 0..=options.max_zoom {
            index.build_level(zoom);
        }
        index
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn cluster_id(zoom: u8, ordinal: usize) -> u64 {
        ((zoom as u64) << 32) | ordinal as u64
    }

    fn build_level(&mut self, zoom: u8) {
        let radius = self.options.radius.max(1.0);
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::default();
        let mut cell_order = Vec::new();

        for (i, point) in self.points.iter().enumerate() {
            let pixel = Viewport::project_at(point, zoom as f64);
            let cell = (
                (pixel.x / radius).floor() as i64,
                (pixel.y / radius).floor() as i64,
            );
            let members = cells.entry(cell).or_default();
            if members.is_empty() {
                cell_order.push(cell);
            }
            members.push(i);
        }

        let mut nodes = Vec::with_capacity(cell_order.len());
        let mut node_of = vec![0; self.points.len()];
        let mut ordinal = 0;

        for cell in cell_order {
            let members = cells.remove(&cell).unwrap_or_default();
            let id = if members.len() > 1 {
                let id = Self::cluster_id(zoom, ordinal);
                ordinal += 1;
                self.cluster_zoom.insert(id, zoom);
                Some(id)
            } else {
                None
            };
            for &member in &members {
                node_of[member] = nodes.len();
            }
            nodes.push(ClusterNode {
                id,
                center: self.centroid(&members),
                members,
            });
        }

        self.levels.insert(zoom, ZoomLevel { nodes, node_of });
    }

    fn centroid(&self, members: &[usize]) -> LatLng {
        let n = members.len().max(1) as f64;
        let (lat, lng) = members.iter().fold((0.0, 0.0), |(lat, lng), &i| {
            (lat + self.points[i].lat, lng + self.points[i].lng)
        });
        LatLng::new(lat / n, lng / n)
    }

    /// Nodes rendered at a zoom; beyond `max_zoom` every point stands alone
    pub fn nodes_at(&self, zoom: f64) -> Vec<ClusterNode> {
        let level = zoom.floor().max(0.0);
        if level > self.options.max_zoom as f64 {
            return self
                .points
                .iter()
                .enumerate()
                .map(|(i, point)| ClusterNode {
                    id: None,
                    center: *point,
                    members: vec![i],
                })
                .collect();
        }
        self.levels
            .get(&(level as u8))
            .map(|l| l.nodes.clone())
            .unwrap_or_default()
    }

    /// Zoom at which the cluster splits into more than one node
    pub fn expansion_zoom(&self, cluster_id: u64) -> Result<f64> {
        let zoom = *self
            .cluster_zoom
            .get(&cluster_id)
            .ok_or_else(|| MapError::Source(format!("no cluster with id {}", cluster_id)))?;

        let level = &self.levels[&zoom];
        let node = &level.nodes[level.node_of_cluster(cluster_id)?];
        let first = node.members[0];

        for deeper in (zoom + 1)..=self.options.max_zoom {
            let level = &self.levels[&deeper];
            if level.nodes[level.node_of[first]].count() < node.count() {
                return Ok(deeper as f64);
            }
        }
        Ok(self.options.max_zoom as f64 + 1.0)
    }

    /// Node as a renderable feature; lone points keep their source feature
    pub fn node_feature(node: &ClusterNode, source: &[Feature]) -> Option<Feature> {
        match node.id {
            None => source.get(*node.members.first()?).cloned(),
            Some(id) => {
                let mut properties = Properties::new();
                properties.insert("cluster".into(), Value::Bool(true));
                properties.insert("cluster_id".into(), Value::from(id));
                properties.insert("point_count".into(), Value::from(node.count() as u64));
                properties.insert(
                    "point_count_abbreviated".into(),
                    Value::from(abbreviate(node.count())),
                );
                Some(Feature::new(Geometry::point(node.center), properties))
            }
        }
    }
}

impl ZoomLevel {
    fn node_of_cluster(&self, cluster_id: u64) -> Result<usize> {
        self.nodes
            .iter()
            .position(|n| n.id == Some(cluster_id))
            .ok_or_else(|| MapError::Source(format!("no cluster with id {}", cluster_id)))
    }
}

/// `1234` -> `1.2k`, as shown on cluster labels
pub fn abbreviate(count: usize) -> String {
    if count >= 10_000 {
        format!("{}k", count / 1000)
    } else if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}
