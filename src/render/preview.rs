use crate::assets::pair::ImagePair;
use crate::foundation::core::{Canvas, Point, Size, Vec2};
use crate::layers::model::{LayerId, TextLayer};
use crate::layers::store::EditorState;
use crate::render::compositor::Compositor;

/// One text layer as a host draws it over the displayed image.
///
/// Position is in percent of the displayed image so the layer follows the viewport; the text is
/// centred on that point and rotated about it.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewText {
    pub layer: TextLayer,
    /// CSS font shorthand, e.g. `700 100px Arial`.
    pub font: String,
    /// `#RRGGBB` fill color.
    pub color: String,
    /// CSS `text-shadow`, e.g. `#000000 0px 0px 4px`.
    pub text_shadow: String,
    /// CSS `transform`, e.g. `translate(-50%, -50%) rotate(45deg)`.
    pub transform: String,
    pub selected: bool,
    /// The layer is the target of the active drag.
    pub grabbing: bool,
}

impl PreviewText {
    fn from_layer(layer: &TextLayer, selected: bool, grabbing: bool) -> Self {
        Self {
            font: format!(
                "{} {}px {}",
                layer.font_weight.get(),
                layer.font_size,
                layer.font_family
            ),
            color: layer.color.to_hex(),
            text_shadow: format!("{} 0px 0px {}px", layer.shadow_color, layer.shadow_blur),
            transform: format!("translate(-50%, -50%) rotate({}deg)", layer.rotation),
            selected,
            grabbing,
            layer: layer.clone(),
        }
    }

    /// Anchor point inside a displayed container of `container` pixels.
    pub fn anchor(&self, container: Size) -> Point {
        Point::new(
            self.layer.x / 100.0 * container.width,
            self.layer.y / 100.0 * container.height,
        )
    }

    /// Whether `at` falls inside this layer's rotated text box of size `text`.
    pub fn contains(&self, at: Point, container: Size, text: Size) -> bool {
        if text.width <= 0.0 || text.height <= 0.0 {
            return false;
        }
        let d: Vec2 = at - self.anchor(container);
        let theta = -f64::from(self.layer.rotation).to_radians();
        let (sin, cos) = theta.sin_cos();
        let local = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
        local.x.abs() <= text.width / 2.0 && local.y.abs() <= text.height / 2.0
    }
}

/// Paint list entry, in back-to-front order.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewItem {
    /// The original photo, natural size.
    Background(Canvas),
    Text(PreviewText),
    /// The subject cutout, natural size.
    Foreground(Canvas),
}

/// Measures a layer's text box in displayed pixels.
pub trait TextMeasure {
    fn measure(&mut self, layer: &TextLayer) -> Option<Size>;
}

impl<F> TextMeasure for F
where
    F: FnMut(&TextLayer) -> Option<Size>,
{
    fn measure(&mut self, layer: &TextLayer) -> Option<Size> {
        self(layer)
    }
}

impl TextMeasure for Compositor {
    fn measure(&mut self, layer: &TextLayer) -> Option<Size> {
        match Compositor::measure(self, layer) {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::debug!(layer = %layer.id, error = %e, "could not measure layer");
                None
            }
        }
    }
}

/// What the live view draws: background, text layers in store order, then foreground.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewScene {
    items: Vec<PreviewItem>,
}

impl PreviewScene {
    pub fn build(state: &EditorState, pair: &ImagePair) -> Self {
        let dragged = state.drag_session().map(|d| d.layer);
        let mut items = Vec::with_capacity(state.len() + 2);
        items.push(PreviewItem::Background(pair.background().canvas()));
        items.extend(state.layers().iter().map(|layer| {
            PreviewItem::Text(PreviewText::from_layer(
                layer,
                state.selected_id() == Some(layer.id),
                dragged == Some(layer.id),
            ))
        }));
        items.push(PreviewItem::Foreground(pair.foreground().canvas()));
        Self { items }
    }

    pub fn items(&self) -> &[PreviewItem] {
        &self.items
    }

    pub fn texts(&self) -> impl DoubleEndedIterator<Item = &PreviewText> {
        self.items.iter().filter_map(|item| match item {
            PreviewItem::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Topmost layer whose rotated text box contains `at`.
    pub fn hit_test(
        &self,
        metrics: &mut impl TextMeasure,
        at: Point,
        container: Size,
    ) -> Option<LayerId> {
        self.texts().rev().find_map(|t| {
            let size = metrics.measure(&t.layer)?;
            t.contains(at, container, size).then_some(t.layer.id)
        })
    }
}

/// Largest size with `natural`'s aspect ratio that fits inside `bounds` without upscaling.
pub fn fit_contain(natural: Canvas, bounds: Size) -> Size {
    let w = f64::from(natural.width);
    let h = f64::from(natural.height);
    if !(bounds.width > 0.0 && bounds.height > 0.0) || w == 0.0 || h == 0.0 {
        return Size::ZERO;
    }
    let s = (bounds.width / w).min(bounds.height / h).min(1.0);
    Size::new(w * s, h * s)
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
