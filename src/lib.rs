//! # mapmode
//!
//! Overview / drill-down view-mode controller for interactive map demos.
//!
//! The rendering engine is reached through [`traits::MapEngine`]; this crate
//! owns the mode state machine, the layer swap, popup anchoring, the
//! navigation control and the cluster-expansion delegate. A deterministic
//! in-memory engine lives in [`engine::headless`].

pub mod background;
pub mod core;
pub mod data;
pub mod demos;
pub mod engine;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod spatial;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

pub use crate::core::{
    controller::{InteractionOutcome, ModeController},
    geo::{LatLng, LatLngBounds, Point},
    mode::{Mode, ModeSpec, ViewState},
    viewport::Viewport,
};

pub use layers::base::{LayerKind, LayerSpec};

pub use data::geojson::{Feature, FeatureCollection, Geometry};

pub use engine::headless::HeadlessEngine;

pub use input::events::{InteractionEvent, InteractionKind};

pub use ui::{controls::NavigationControl, popup::PopupPresenter};

pub use traits::{MapControl, MapEngine};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Map is not loaded yet")]
    NotReady,

    #[error("Configuration error: {0}")]
    Config(String),
}
