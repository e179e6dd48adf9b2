use crate::foundation::core::Rgb8;
use crate::layers::model::{
    FontFamily, FontWeight, LayerId, LayerPatch, MAX_FONT_SIZE, MAX_SHADOW_BLUR, MIN_FONT_SIZE,
};
use crate::layers::store::EditorState;

/// Numeric range and step of a slider control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const POSITION: Self = Self::new(0.0, 100.0, 1.0);
    pub const FONT_SIZE: Self = Self::new(MIN_FONT_SIZE as f64, MAX_FONT_SIZE as f64, 1.0);
    pub const FONT_WEIGHT: Self = Self::new(100.0, 900.0, 100.0);
    pub const OPACITY: Self = Self::new(0.0, 1.0, 0.01);
    pub const ROTATION: Self = Self::new(0.0, 360.0, 1.0);
    pub const SHADOW_BLUR: Self = Self::new(0.0, MAX_SHADOW_BLUR as f64, 1.0);

    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Snap `v` onto the slider: clamp into range, then round to the nearest step.
    ///
    /// Returns `None` for NaN.
    pub fn snap(self, v: f64) -> Option<f64> {
        if v.is_nan() {
            return None;
        }
        let clamped = v.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        Some((self.min + steps * self.step).clamp(self.min, self.max))
    }
}

/// One user input from the property panel.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyEdit {
    Text(String),
    /// Position sliders take fractional input (drags produce fractions too); only clamped.
    X(f64),
    Y(f64),
    FontSize(f64),
    FontFamily(FontFamily),
    FontWeight(f64),
    Color(Rgb8),
    /// Free-form hex entry next to the color picker.
    ColorHex(String),
    Opacity(f64),
    Rotation(f64),
    ShadowColor(Rgb8),
    ShadowColorHex(String),
    ShadowBlur(f64),
}

impl PropertyEdit {
    /// Map the input onto a layer patch.
    ///
    /// Returns `None` when the input carries nothing usable (NaN, unparsable hex).
    pub fn to_patch(&self) -> Option<LayerPatch> {
        let patch = LayerPatch::default();
        let patch = match self {
            PropertyEdit::Text(s) => patch.text(s.clone()),
            PropertyEdit::X(v) => patch.x(*v),
            PropertyEdit::Y(v) => patch.y(*v),
            PropertyEdit::FontSize(v) => {
                patch.font_size(SliderRange::FONT_SIZE.snap(*v)? as u32)
            }
            PropertyEdit::FontFamily(f) => patch.font_family(*f),
            PropertyEdit::FontWeight(v) => {
                patch.font_weight(FontWeight::snapped(SliderRange::FONT_WEIGHT.snap(*v)?))
            }
            PropertyEdit::Color(c) => patch.color(*c),
            PropertyEdit::ColorHex(s) => patch.color(Rgb8::from_hex(s).ok()?),
            PropertyEdit::Opacity(v) => patch.opacity(SliderRange::OPACITY.snap(*v)?),
            PropertyEdit::Rotation(v) => {
                patch.rotation(SliderRange::ROTATION.snap(*v)? as u32 % 360)
            }
            PropertyEdit::ShadowColor(c) => patch.shadow_color(*c),
            PropertyEdit::ShadowColorHex(s) => patch.shadow_color(Rgb8::from_hex(s).ok()?),
            PropertyEdit::ShadowBlur(v) => {
                patch.shadow_blur(SliderRange::SHADOW_BLUR.snap(*v)? as u32)
            }
        };
        Some(patch)
    }
}

impl EditorState {
    /// Apply a property-panel input to the selected layer.
    pub fn apply_edit(&mut self, edit: &PropertyEdit) -> bool {
        if self.selected_id().is_none() {
            return false;
        }
        match edit.to_patch() {
            Some(patch) => self.update_selected(&patch),
            None => {
                tracing::debug!(?edit, "ignored unusable property input");
                false
            }
        }
    }
}

/// Read-only view of the property panel for the selected layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyPanel {
    pub layer: LayerId,
    pub text: String,
    pub x: f64,
    pub x_label: String,
    pub y: f64,
    pub y_label: String,
    pub font_size: u32,
    pub font_size_label: String,
    pub font_family: FontFamily,
    pub font_families: &'static [FontFamily],
    pub font_weight: u16,
    pub font_weight_label: String,
    pub color_hex: String,
    pub opacity: f64,
    pub opacity_label: String,
    pub rotation: u32,
    pub rotation_label: String,
    pub shadow_color_hex: String,
    pub shadow_blur: u32,
    pub shadow_blur_label: String,
}

impl PropertyPanel {
    /// Panel contents, or `None` when nothing is selected (the panel is hidden).
    pub fn for_state(state: &EditorState) -> Option<Self> {
        let l = state.selected()?;
        Some(Self {
            layer: l.id,
            text: l.text.clone(),
            x: l.x,
            x_label: format!("{}%", l.x.round()),
            y: l.y,
            y_label: format!("{}%", l.y.round()),
            font_size: l.font_size,
            font_size_label: format!("{}px", l.font_size),
            font_family: l.font_family,
            font_families: &FontFamily::ALL,
            font_weight: l.font_weight.get(),
            font_weight_label: l.font_weight.get().to_string(),
            color_hex: l.color.to_hex(),
            opacity: l.opacity,
            opacity_label: format!("{}%", (l.opacity * 100.0).round()),
            rotation: l.rotation,
            rotation_label: format!("{}°", l.rotation),
            shadow_color_hex: l.shadow_color.to_hex(),
            shadow_blur: l.shadow_blur,
            shadow_blur_label: format!("{}px", l.shadow_blur),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/controls.rs"]
mod tests;
