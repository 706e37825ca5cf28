use crate::{
    constants::DEFAULT_ZOOM_DELTA,
    traits::{ControlPosition, MapControl, MapEngine},
};
use serde::{Deserialize, Serialize};

/// Buttons of the navigation control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavButton {
    ZoomIn,
    ZoomOut,
    Home,
}

impl NavButton {
    pub fn class(&self) -> &'static str {
        match self {
            NavButton::ZoomIn => "mapboxgl-ctrl-icon mapboxgl-ctrl-zoom-in",
            NavButton::ZoomOut => "mapboxgl-ctrl-icon mapboxgl-ctrl-zoom-out",
            NavButton::Home => "mapboxgl-ctrl-icon gdc-ctrl-home",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavButton::ZoomIn => "+",
            NavButton::ZoomOut => "-",
            NavButton::Home => "⌂",
        }
    }
}

/// Root element a control hands to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlElement {
    pub id: String,
    pub class: String,
    /// Buttons in display order
    pub children: Vec<NavButton>,
}

impl ControlElement {
    pub fn contains(&self, button: NavButton) -> bool {
        self.children.contains(&button)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub show_zoom: bool,
    pub show_home: bool,
    pub position: ControlPosition,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            show_zoom: true,
            show_home: false,
            position: ControlPosition::TopLeft,
        }
    }
}

/// What a button press asks of the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    ZoomedIn,
    ZoomedOut,
    /// The owner should navigate back to the overview
    Home,
}

/// Zoom-in / zoom-out / home widget
pub struct NavigationControl {
    config: NavigationConfig,
    root: ControlElement,
    home_handler: Option<Box<dyn FnMut()>>,
    attached: bool,
}

impl NavigationControl {
    pub const ID: &'static str = "navigation-control";

    pub fn new(config: NavigationConfig) -> Self {
        let mut children = Vec::new();
        if config.show_zoom {
            children.push(NavButton::ZoomIn);
            children.push(NavButton::ZoomOut);
        }
        if config.show_home {
            children.push(NavButton::Home);
        }

        Self {
            config,
            root: ControlElement {
                id: Self::ID.to_string(),
                class: "mapboxgl-ctrl-group mapboxgl-ctrl".to_string(),
                children,
            },
            home_handler: None,
            attached: false,
        }
    }

    /// Extra callback run whenever home is pressed
    pub fn with_home_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.home_handler = Some(Box::new(handler));
        self
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn root(&self) -> &ControlElement {
        &self.root
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_home_visible(&self) -> bool {
        self.root.contains(NavButton::Home)
    }

    /// Appends the home button; never duplicates it
    pub fn show_home(&mut self) {
        if !self.is_home_visible() {
            self.root.children.push(NavButton::Home);
        }
    }

    pub fn hide_home(&mut self) {
        self.root.children.retain(|b| *b != NavButton::Home);
    }

    /// Handles a click on `button`; buttons not currently shown are ignored
    pub fn press(&mut self, button: NavButton, engine: &mut dyn MapEngine) -> Option<ControlAction> {
        if !self.root.contains(button) {
            return None;
        }

        match button {
            NavButton::ZoomIn => {
                engine.zoom_by(DEFAULT_ZOOM_DELTA);
                Some(ControlAction::ZoomedIn)
            }
            NavButton::ZoomOut => {
                engine.zoom_by(-DEFAULT_ZOOM_DELTA);
                Some(ControlAction::ZoomedOut)
            }
            NavButton::Home => {
                if let Some(handler) = self.home_handler.as_mut() {
                    handler();
                }
                Some(ControlAction::Home)
            }
        }
    }
}

impl Default for NavigationControl {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl MapControl for NavigationControl {
    fn on_add(&mut self, engine: &mut dyn MapEngine) -> &ControlElement {
        engine.add_control(&self.root, self.config.position);
        self.attached = true;
        &self.root
    }

    fn on_remove(&mut self, engine: &mut dyn MapEngine) {
        if self.attached {
            engine.remove_control(&self.root.id);
            self.attached = false;
        }
    }
}
