//! Prelude module for common mapmode types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapmode::prelude::*;`

pub use crate::core::{
    config::{DemoOptions, DemoProfile, TransitionStyle},
    controller::{InteractionOutcome, ModeController},
    geo::{LatLng, LatLngBounds, Point},
    mode::{
        CameraTarget, DemoSpec, HandlerAction, HandlerBinding, HomeControl, Legend, Mode, ModeSpec,
        ViewState,
    },
    viewport::{Camera, Viewport},
};

pub use crate::layers::{
    base::{LayerFilter, LayerKind, LayerSpec},
    manager::LayerManager,
    style::{LegendEntry, StepExpression},
};

pub use crate::data::geojson::{Feature, FeatureCollection, GeoResult, Geometry};

pub use crate::input::{
    events::{Cursor, InteractionEvent, InteractionKind},
    handler::HandlerRegistry,
};

pub use crate::spatial::{
    clustering::{ClusterIndex, ClusterOptions},
    index::SpatialIndex,
};

pub use crate::background::tasks::{Completion, CompletionQueue, Ticket};

pub use crate::engine::headless::{CameraMove, HeadlessEngine};

pub use crate::ui::{
    controls::{ControlAction, ControlElement, NavButton, NavigationConfig, NavigationControl},
    page::{PageAction, PageControls, PageElement},
    popup::{Popup, PopupPresenter, PopupTemplate},
};

pub use crate::traits::{ControlPosition, ExpansionCallback, MapControl, MapEngine, SourceSpec};

pub use crate::demos::DemoKind;

pub use crate::{MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
