use crate::interaction::gesture::DragSession;
use crate::layers::model::{LayerId, LayerPatch, TextLayer};

/// Editing state for one image: ordered layers, selection and the active drag.
///
/// Layer order is paint order (first = lowest). The selection is a weak reference: it never
/// names a layer that is not in `layers`.
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    layers: Vec<TextLayer>,
    selected: Option<LayerId>,
    pub(crate) drag: Option<DragSession>,
    next_id: u64,
}

/// Row of the layer list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerEntry {
    pub id: LayerId,
    pub label: String,
    pub selected: bool,
}

impl EditorState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from existing layers, assigning fresh ids and clamping every field.
    ///
    /// Nothing is selected afterwards.
    pub fn from_layers(layers: impl IntoIterator<Item = TextLayer>) -> Self {
        let mut state = Self::new();
        for mut layer in layers {
            layer.id = state.fresh_id();
            state.layers.push(layer.sanitized());
        }
        state
    }

    fn fresh_id(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId(self.next_id)
    }

    /// Append a layer with default styling and select it.
    pub fn add_layer(&mut self) -> LayerId {
        let id = self.fresh_id();
        self.layers.push(TextLayer::with_defaults(id));
        self.selected = Some(id);
        tracing::debug!(%id, count = self.layers.len(), "layer added");
        id
    }

    /// Remove the layer with `id`; absent ids are ignored.
    ///
    /// Returns `true` when a layer was removed.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.layers.remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.is_some_and(|d| d.layer == id) {
            self.drag = None;
        }
        tracing::debug!(%id, count = self.layers.len(), "layer removed");
        true
    }

    /// Select the layer with `id` if it exists.
    pub fn select_layer(&mut self, id: LayerId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Apply `patch` to the selected layer; does nothing without a selection.
    pub fn update_selected(&mut self, patch: &LayerPatch) -> bool {
        match self.selected {
            Some(id) => self.update_layer(id, patch),
            None => false,
        }
    }

    pub(crate) fn update_layer(&mut self, id: LayerId, patch: &LayerPatch) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                patch.apply_to(layer);
                true
            }
            None => false,
        }
    }

    /// Layers in paint order.
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selected_id(&self) -> Option<LayerId> {
        self.selected
    }

    /// The selected layer, if any.
    pub fn selected(&self) -> Option<&TextLayer> {
        self.selected.and_then(|id| self.layer(id))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Entries for the layer list, in paint order.
    pub fn layer_entries(&self) -> Vec<LayerEntry> {
        self.layers
            .iter()
            .map(|l| LayerEntry {
                id: l.id,
                label: l.label().to_owned(),
                selected: self.selected == Some(l.id),
            })
            .collect()
    }

    /// Drop interaction state (drag) while keeping layers and selection.
    pub(crate) fn end_interaction(&mut self) {
        self.drag = None;
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/store.rs"]
mod tests;
