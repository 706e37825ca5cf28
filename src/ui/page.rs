//! Page-level widgets living outside the map canvas
//!
//! Each widget is addressed by a [`PageElement`] and each click is turned
//! into a typed [`PageAction`] before it reaches the controller.

use crate::prelude::HashMap;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageElement {
    /// "Max bounds" checkbox
    MaxBoundsToggle,
    /// "Legends" checkbox
    LegendToggle,
    /// Back-to-overview button
    BackButton,
}

impl PageElement {
    /// Selector the element is looked up by in an HTML page
    pub fn selector(&self) -> &'static str {
        match self {
            PageElement::MaxBoundsToggle => ".max-bounds",
            PageElement::LegendToggle => ".chk-legends",
            PageElement::BackButton => ".back-btn",
        }
    }

    pub fn is_checkbox(&self) -> bool {
        !matches!(self, PageElement::BackButton)
    }
}

/// A click on a page widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    MaxBounds(bool),
    Legends(bool),
    Back,
}

impl PageAction {
    pub fn element(&self) -> PageElement {
        match self {
            PageAction::MaxBounds(_) => PageElement::MaxBoundsToggle,
            PageAction::Legends(_) => PageElement::LegendToggle,
            PageAction::Back => PageElement::BackButton,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ElementState {
    visible: bool,
    checked: bool,
}

/// The set of page widgets a demo is wired to
#[derive(Debug, Clone, Default)]
pub struct PageControls {
    elements: HashMap<PageElement, ElementState>,
}

impl PageControls {
    /// Wires the given elements; checkboxes start visible and unchecked, the
    /// back button starts hidden
    pub fn new(available: impl IntoIterator<Item = PageElement>) -> Self {
        let elements = available
            .into_iter()
            .map(|element| {
                let state = ElementState {
                    visible: element.is_checkbox(),
                    checked: false,
                };
                (element, state)
            })
            .collect();
        Self { elements }
    }

    /// Every page element there is
    pub fn all() -> Self {
        Self::new([
            PageElement::MaxBoundsToggle,
            PageElement::LegendToggle,
            PageElement::BackButton,
        ])
    }

    pub fn is_wired(&self, element: PageElement) -> bool {
        self.elements.contains_key(&element)
    }

    /// Fails with the first missing element
    pub fn require(&self, required: &[PageElement]) -> Result<()> {
        match required.iter().find(|e| !self.is_wired(**e)) {
            Some(missing) => Err(MapError::Config(format!(
                "required page element {} is missing",
                missing.selector()
            ))),
            None => Ok(()),
        }
    }

    pub fn is_visible(&self, element: PageElement) -> bool {
        self.elements.get(&element).map_or(false, |s| s.visible)
    }

    pub fn set_visible(&mut self, element: PageElement, visible: bool) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.visible = visible;
        }
    }

    pub fn is_checked(&self, element: PageElement) -> bool {
        self.elements.get(&element).map_or(false, |s| s.checked)
    }

    /// Records the widget state an action implies
    pub fn record(&mut self, action: PageAction) -> Result<()> {
        let element = action.element();
        let state = self.elements.get_mut(&element).ok_or_else(|| {
            MapError::Config(format!("page element {} is not wired", element.selector()))
        })?;

        match action {
            PageAction::MaxBounds(checked) | PageAction::Legends(checked) => state.checked = checked,
            PageAction::Back => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_element_is_config_error() {
        let page = PageControls::new([PageElement::LegendToggle]);
        let err = page
            .require(&[PageElement::LegendToggle, PageElement::MaxBoundsToggle])
            .unwrap_err();
        assert!(matches!(err, MapError::Config(msg) if msg.contains(".max-bounds")));
    }

    #[test]
    fn test_record_checkbox_state() {
        let mut page = PageControls::all();
        assert!(!page.is_visible(PageElement::BackButton));
        assert!(page.is_visible(PageElement::LegendToggle));

        page.record(PageAction::Legends(true)).unwrap();
        assert!(page.is_checked(PageElement::LegendToggle));
        page.record(PageAction::Legends(false)).unwrap();
        assert!(!page.is_checked(PageElement::LegendToggle));
    }

    #[test]
    fn test_unwired_action_is_rejected() {
        let mut page = PageControls::new([]);
        assert!(page.record(PageAction::Back).is_err());
    }

    #[test]
    fn test_action_parses_from_json() {
        let action: PageAction = serde_json::from_str(r#"{"max_bounds": true}"#).unwrap();
        assert_eq!(action, PageAction::MaxBounds(true));
        let back: PageAction = serde_json::from_str(r#""back""#).unwrap();
        assert_eq!(back, PageAction::Back);
    }
}
