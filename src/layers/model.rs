use crate::foundation::core::{Rgb8, clamp_percent};
use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Smallest font size a layer can carry, in displayed pixels.
pub const MIN_FONT_SIZE: u32 = 10;
/// Largest font size a layer can carry, in displayed pixels.
pub const MAX_FONT_SIZE: u32 = 300;
/// Largest shadow blur radius, in displayed pixels.
pub const MAX_SHADOW_BLUR: u32 = 50;

/// Opaque layer identifier, stable for the layer's lifetime.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Generic family used when a named family is not installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    /// Proportional sans-serif.
    SansSerif,
    /// Proportional serif.
    Serif,
    /// Fixed-width.
    Monospace,
    /// Script / informal.
    Cursive,
}

/// The fixed set of font families offered by the editor.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum FontFamily {
    #[default]
    Arial,
    Verdana,
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
    Georgia,
    Palatino,
    Garamond,
    Bookman,
    #[serde(rename = "Comic Sans MS")]
    ComicSansMs,
    #[serde(rename = "Trebuchet MS")]
    TrebuchetMs,
    #[serde(rename = "Arial Black")]
    ArialBlack,
    Impact,
}

impl FontFamily {
    /// Every family, in menu order.
    pub const ALL: [FontFamily; 13] = [
        FontFamily::Arial,
        FontFamily::Verdana,
        FontFamily::Helvetica,
        FontFamily::TimesNewRoman,
        FontFamily::CourierNew,
        FontFamily::Georgia,
        FontFamily::Palatino,
        FontFamily::Garamond,
        FontFamily::Bookman,
        FontFamily::ComicSansMs,
        FontFamily::TrebuchetMs,
        FontFamily::ArialBlack,
        FontFamily::Impact,
    ];

    /// Family name as installed on the system and shown in the menu.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Verdana => "Verdana",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Georgia => "Georgia",
            FontFamily::Palatino => "Palatino",
            FontFamily::Garamond => "Garamond",
            FontFamily::Bookman => "Bookman",
            FontFamily::ComicSansMs => "Comic Sans MS",
            FontFamily::TrebuchetMs => "Trebuchet MS",
            FontFamily::ArialBlack => "Arial Black",
            FontFamily::Impact => "Impact",
        }
    }

    /// Generic family to fall back on when the named one is missing.
    pub fn generic(self) -> GenericFamily {
        match self {
            FontFamily::TimesNewRoman
            | FontFamily::Georgia
            | FontFamily::Palatino
            | FontFamily::Garamond
            | FontFamily::Bookman => GenericFamily::Serif,
            FontFamily::CourierNew => GenericFamily::Monospace,
            FontFamily::ComicSansMs => GenericFamily::Cursive,
            _ => GenericFamily::SansSerif,
        }
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FontFamily {
    type Err = TextBehindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FontFamily::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TextBehindError::validation(format!("unknown font family \"{s}\"")))
    }
}

/// CSS-style numeric font weight: a multiple of 100 in `100..=900`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct FontWeight(u16);

impl FontWeight {
    /// 400.
    pub const NORMAL: Self = Self(400);
    /// 700.
    pub const BOLD: Self = Self(700);

    /// Create a validated weight.
    pub fn new(v: u16) -> TextBehindResult<Self> {
        if !(100..=900).contains(&v) || v % 100 != 0 {
            return Err(TextBehindError::validation(format!(
                "font weight must be one of 100..=900 in steps of 100, got {v}"
            )));
        }
        Ok(Self(v))
    }

    /// Round an arbitrary value to the nearest valid weight.
    pub fn snapped(v: f64) -> Self {
        if !v.is_finite() {
            return Self::NORMAL;
        }
        let hundreds = (v / 100.0).round().clamp(1.0, 9.0) as u16;
        Self(hundreds * 100)
    }

    /// Numeric weight value.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::BOLD
    }
}

impl<'de> serde::Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = u16::deserialize(deserializer)?;
        Self::new(v).map_err(serde::de::Error::custom)
    }
}

/// A positioned, styled text caption painted between background and foreground.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextLayer {
    /// Stable identifier.
    pub id: LayerId,
    /// Caption content; may be empty.
    pub text: String,
    /// Horizontal center, percent of displayed width.
    pub x: f64,
    /// Vertical center, percent of displayed height.
    pub y: f64,
    /// Size in displayed pixels.
    pub font_size: u32,
    /// Named font family.
    pub font_family: FontFamily,
    /// Numeric font weight.
    pub font_weight: FontWeight,
    /// Fill color.
    pub color: Rgb8,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    /// Drop shadow color.
    pub shadow_color: Rgb8,
    /// Drop shadow blur radius in displayed pixels; `0` disables the shadow.
    pub shadow_blur: u32,
    /// Clockwise rotation in degrees, `[0, 360)`.
    pub rotation: u32,
}

impl TextLayer {
    /// A layer with the editor's defaults: centered, white, bold 100px Arial.
    pub fn with_defaults(id: LayerId) -> Self {
        Self {
            id,
            text: "New Text".to_owned(),
            x: 50.0,
            y: 50.0,
            font_size: 100,
            font_family: FontFamily::Arial,
            font_weight: FontWeight::BOLD,
            color: Rgb8::WHITE,
            opacity: 1.0,
            shadow_color: Rgb8::BLACK,
            shadow_blur: 0,
            rotation: 0,
        }
    }

    /// Force every field into its documented range.
    pub fn sanitized(mut self) -> Self {
        self.x = clamp_percent(self.x).unwrap_or(50.0);
        self.y = clamp_percent(self.y).unwrap_or(50.0);
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.opacity = clamp_opacity(self.opacity).unwrap_or(1.0);
        self.shadow_blur = self.shadow_blur.min(MAX_SHADOW_BLUR);
        self.rotation %= 360;
        self
    }

    /// Whether the layer casts a drop shadow.
    pub fn has_shadow(&self) -> bool {
        self.shadow_blur > 0
    }

    /// Label shown in the layer list.
    pub fn label(&self) -> &str {
        if self.text.is_empty() {
            "Empty Text"
        } else {
            &self.text
        }
    }
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::with_defaults(LayerId(0))
    }
}

/// A partial update to a layer; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerPatch {
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub font_size: Option<u32>,
    pub font_family: Option<FontFamily>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<Rgb8>,
    pub opacity: Option<f64>,
    pub shadow_color: Option<Rgb8>,
    pub shadow_blur: Option<u32>,
    pub rotation: Option<u32>,
}

impl LayerPatch {
    pub fn text(mut self, v: impl Into<String>) -> Self {
        self.text = Some(v.into());
        self
    }

    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    pub fn position(self, x: f64, y: f64) -> Self {
        self.x(x).y(y)
    }

    pub fn font_size(mut self, v: u32) -> Self {
        self.font_size = Some(v);
        self
    }

    pub fn font_family(mut self, v: FontFamily) -> Self {
        self.font_family = Some(v);
        self
    }

    pub fn font_weight(mut self, v: FontWeight) -> Self {
        self.font_weight = Some(v);
        self
    }

    pub fn color(mut self, v: Rgb8) -> Self {
        self.color = Some(v);
        self
    }

    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn shadow_color(mut self, v: Rgb8) -> Self {
        self.shadow_color = Some(v);
        self
    }

    pub fn shadow_blur(mut self, v: u32) -> Self {
        self.shadow_blur = Some(v);
        self
    }

    pub fn rotation(mut self, v: u32) -> Self {
        self.rotation = Some(v);
        self
    }

    /// Whether the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the patch into `layer`, clamping on the way in.
    ///
    /// Position fields clamp to `[0, 100]`; a NaN position is dropped.
    pub(crate) fn apply_to(&self, layer: &mut TextLayer) {
        if let Some(text) = &self.text {
            layer.text.clone_from(text);
        }
        if let Some(x) = self.x.and_then(clamp_percent) {
            layer.x = x;
        }
        if let Some(y) = self.y.and_then(clamp_percent) {
            layer.y = y;
        }
        if let Some(size) = self.font_size {
            layer.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        }
        if let Some(family) = self.font_family {
            layer.font_family = family;
        }
        if let Some(weight) = self.font_weight {
            layer.font_weight = weight;
        }
        if let Some(color) = self.color {
            layer.color = color;
        }
        if let Some(opacity) = self.opacity.and_then(clamp_opacity) {
            layer.opacity = opacity;
        }
        if let Some(color) = self.shadow_color {
            layer.shadow_color = color;
        }
        if let Some(blur) = self.shadow_blur {
            layer.shadow_blur = blur.min(MAX_SHADOW_BLUR);
        }
        if let Some(rotation) = self.rotation {
            layer.rotation = rotation % 360;
        }
    }
}

/// Parse a JSON array of layers; missing fields take the editor defaults.
pub fn layers_from_json(reader: impl std::io::Read) -> TextBehindResult<Vec<TextLayer>> {
    serde_json::from_reader(reader)
        .map_err(|e| TextBehindError::serde(format!("layers JSON: {e}")))
}

fn clamp_opacity(v: f64) -> Option<f64> {
    if v.is_nan() {
        return None;
    }
    Some(v.clamp(0.0, 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/layers/model.rs"]
mod tests;
