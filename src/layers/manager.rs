use crate::{layers::base::LayerSpec, MapError, Result};

use crate::prelude::HashMap;

/// Attached layers of a view, in draw order
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, LayerSpec>,
    /// Layer IDs in the order they were added (drawn bottom to top)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer on top of the stack; ids must be unique
    pub fn add_layer(&mut self, layer: LayerSpec) -> Result<()> {
        if self.layers.contains_key(&layer.id) {
            return Err(MapError::Layer(format!(
                "layer '{}' already exists",
                layer.id
            )));
        }

        self.render_order.push(layer.id.clone());
        self.layers.insert(layer.id.clone(), layer);
        Ok(())
    }

    /// Removes a layer by id
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<LayerSpec> {
        let layer = self
            .layers
            .remove(layer_id)
            .ok_or_else(|| MapError::Layer(format!("layer '{}' does not exist", layer_id)))?;
        self.render_order.retain(|id| id != layer_id);
        Ok(layer)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&LayerSpec> {
        self.layers.get(layer_id)
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    /// Layer ids in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&LayerSpec> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id))
            .collect()
    }

    /// Layers bound to the given source
    pub fn layers_for_source<'a>(&'a self, source_id: &'a str) -> impl Iterator<Item = &'a LayerSpec> {
        self.layers().into_iter().filter(move |l| l.source == source_id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerKind;

    fn layer(id: &str) -> LayerSpec {
        LayerSpec::new(id, LayerKind::Circle, "mysource")
    }

    #[test]
    fn test_add_and_remove_keeps_order() {
        let mut manager = LayerManager::new();
        manager.add_layer(layer("mycircle-value")).unwrap();
        manager.add_layer(layer("mycircle")).unwrap();
        manager.add_layer(layer("other")).unwrap();

        manager.remove_layer("mycircle").unwrap();
        assert_eq!(manager.list_layers(), vec!["mycircle-value", "other"]);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_duplicate_and_missing_layers_error() {
        let mut manager = LayerManager::new();
        manager.add_layer(layer("a")).unwrap();
        assert!(matches!(manager.add_layer(layer("a")), Err(MapError::Layer(_))));
        assert!(matches!(manager.remove_layer("b"), Err(MapError::Layer(_))));
    }
}
