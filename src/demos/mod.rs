//! The four demo maps, built from fixture files
//!
//! Each submodule exposes its layer definitions and a `build` function
//! taking already-loaded datasets; [`DemoKind::build`] does the loading.

pub mod clustering;
pub mod markers;
pub mod polygon;
pub mod zooming;

use crate::{
    core::{
        config::{DemoOptions, DemoProfile},
        mode::DemoSpec,
    },
    data::geojson::FeatureCollection,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    Polygon,
    Zooming,
    Markers,
    Clustering,
}

impl DemoKind {
    pub const ALL: [DemoKind; 4] = [
        DemoKind::Polygon,
        DemoKind::Zooming,
        DemoKind::Markers,
        DemoKind::Clustering,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DemoKind::Polygon => "polygon",
            DemoKind::Zooming => "zooming",
            DemoKind::Markers => "markers",
            DemoKind::Clustering => "clustering",
        }
    }

    pub fn profile(&self) -> DemoProfile {
        match self {
            DemoKind::Polygon => DemoProfile::Polygon,
            DemoKind::Zooming => DemoProfile::Zooming,
            DemoKind::Markers => DemoProfile::Markers,
            DemoKind::Clustering => DemoProfile::Clustering,
        }
    }

    /// Fixture files read from the fixture directory
    pub fn fixtures(&self) -> &'static [&'static str] {
        match self {
            DemoKind::Polygon => &["us_states_only.json", "us_polygon.json"],
            DemoKind::Zooming => &["usstates.json"],
            DemoKind::Markers => &["usstates.json", "wifi.json"],
            DemoKind::Clustering => &["geo_pushpin.json"],
        }
    }

    /// Builds the demo with its preset options
    pub fn build(&self, fixtures: &Path) -> Result<DemoSpec> {
        self.build_with(fixtures, self.profile().resolve())
    }

    pub fn build_with(&self, fixtures: &Path, options: DemoOptions) -> Result<DemoSpec> {
        let mut datasets = self
            .fixtures()
            .iter()
            .map(|name| load_fixture(fixtures, name))
            .collect::<Result<Vec<_>>>()?
            .into_iter();
        let mut next = || datasets.next().unwrap_or_default();

        Ok(match self {
            DemoKind::Polygon => {
                let states = next();
                polygon::build(options, states, next())
            }
            DemoKind::Zooming => zooming::build(options, next()),
            DemoKind::Markers => {
                let cities = next();
                markers::build(options, cities, next())
            }
            DemoKind::Clustering => clustering::build(options, next()),
        })
    }
}

impl std::fmt::Display for DemoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MapError::Config(format!("unknown demo '{}'", s)))
    }
}

fn load_fixture(dir: &Path, name: &str) -> Result<FeatureCollection> {
    let path = dir.join(name);
    #[cfg(feature = "debug")]
    log::debug!("loading fixture {}", path.display());
    FeatureCollection::from_file(&path)
        .map_err(|e| MapError::Config(format!("fixture {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_kind() {
        assert_eq!("Markers".parse::<DemoKind>().unwrap(), DemoKind::Markers);
        assert!(matches!("heatmap".parse::<DemoKind>(), Err(MapError::Config(_))));
    }

    #[test]
    fn test_missing_fixture_dir_is_config_error() {
        let err = DemoKind::Zooming
            .build(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, MapError::Config(msg) if msg.contains("usstates.json")));
    }
}
