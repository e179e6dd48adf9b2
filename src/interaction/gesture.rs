use crate::foundation::core::{Point, Size, Vec2};
use crate::layers::model::{LayerId, LayerPatch};
use crate::layers::store::EditorState;

/// Pointer input over the image container, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed on the rendered text of `layer`.
    Down { layer: LayerId, at: Point },
    /// Pointer moved; `container` is the image container's current rendered size.
    Move { at: Point, container: Size },
    /// Pointer released.
    Up,
    /// Pointer left the tracking region.
    Leave,
}

/// An in-progress drag of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Layer being dragged.
    pub layer: LayerId,
    /// Last captured pointer position; deltas are measured from here.
    pub last: Point,
}

/// Convert a screen-pixel delta into a percentage delta of `container`.
///
/// Returns `None` when the container has no usable area.
pub fn percent_delta(delta: Vec2, container: Size) -> Option<Vec2> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(container.width) || !usable(container.height) {
        return None;
    }
    Some(Vec2::new(
        delta.x / container.width * 100.0,
        delta.y / container.height * 100.0,
    ))
}

impl EditorState {
    /// Apply one pointer event.
    ///
    /// Returns `true` when layer data or selection changed (the scene needs a repaint).
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { layer, at } => {
                if !self.select_layer(layer) {
                    return false;
                }
                // A second press re-targets the existing session instead of stacking.
                self.drag = Some(DragSession { layer, last: at });
                true
            }
            PointerEvent::Move { at, container } => self.drag_to(at, container),
            PointerEvent::Up | PointerEvent::Leave => {
                self.end_interaction();
                false
            }
        }
    }

    fn drag_to(&mut self, at: Point, container: Size) -> bool {
        let Some(session) = self.drag else {
            return false;
        };
        let Some(delta) = percent_delta(at - session.last, container) else {
            return false;
        };
        let Some(layer) = self.layer(session.layer) else {
            self.drag = None;
            return false;
        };

        let patch = LayerPatch::default().position(layer.x + delta.x, layer.y + delta.y);
        self.update_layer(session.layer, &patch);
        self.drag = Some(DragSession {
            layer: session.layer,
            last: at,
        });
        true
    }

    /// The active drag, if any.
    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/gesture.rs"]
mod tests;
