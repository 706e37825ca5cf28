use crate::input::events::InteractionKind;
use crate::prelude::HashMap;

/// Handler table keyed by (interaction kind, layer id).
///
/// The engine keeps one with `()` payloads to know which layers report
/// events; the controller keeps one mapping each binding to its action.
#[derive(Debug, Clone)]
pub struct HandlerRegistry<A = ()> {
    bindings: HashMap<(InteractionKind, String), A>,
}

impl<A> HandlerRegistry<A> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::default(),
        }
    }

    /// Registers a binding; returns false if it was already present
    pub fn register(&mut self, kind: InteractionKind, layer_id: &str, action: A) -> bool {
        self.bindings
            .insert((kind, layer_id.to_string()), action)
            .is_none()
    }

    /// Removes a binding; returns false if it was not registered
    pub fn deregister(&mut self, kind: InteractionKind, layer_id: &str) -> bool {
        self.bindings.remove(&(kind, layer_id.to_string())).is_some()
    }

    pub fn get(&self, kind: InteractionKind, layer_id: &str) -> Option<&A> {
        self.bindings.get(&(kind, layer_id.to_string()))
    }

    pub fn is_registered(&self, kind: InteractionKind, layer_id: &str) -> bool {
        self.get(kind, layer_id).is_some()
    }

    /// Layers with a binding for `kind`
    pub fn layers_for(&self, kind: InteractionKind) -> Vec<String> {
        let mut layers: Vec<String> = self
            .bindings
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, layer)| layer.clone())
            .collect();
        layers.sort();
        layers
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<A> Default for HandlerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}
