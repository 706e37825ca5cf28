pub mod controls;
pub mod page;
pub mod popup;

#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{ControlAction, ControlElement, NavButton, NavigationConfig, NavigationControl};

pub use page::{PageAction, PageControls, PageElement};

pub use popup::{AnchorMode, Popup, PopupPresenter, PopupRow, PopupTemplate};

#[cfg(feature = "egui")]
pub use widget::{parse_color, show_legend, show_navigation};
