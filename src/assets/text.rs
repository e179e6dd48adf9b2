use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{TextBehindError, TextBehindResult};
use crate::layers::model::{FontFamily, FontWeight, GenericFamily};

/// Extra font directory read from the environment when building a [`FontBook`].
pub const FONT_DIR_ENV: &str = "TEXTBEHIND_FONT_DIR";

// Metric-compatible or widely installed stand-ins for the editor's families.
const SANS_SUBSTITUTES: &[&str] = &[
    "Liberation Sans",
    "Arimo",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];
const SERIF_SUBSTITUTES: &[&str] = &[
    "Liberation Serif",
    "Tinos",
    "DejaVu Serif",
    "Noto Serif",
    "FreeSerif",
];
const MONO_SUBSTITUTES: &[&str] = &[
    "Liberation Mono",
    "Cousine",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "FreeMono",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// A concrete font face chosen for a family/weight request.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub(crate) id: usvg::fontdb::ID,
    /// Family name of the face actually selected.
    pub family_name: String,
    /// Weight of the face actually selected.
    pub weight: u16,
    /// Whether the requested family was found (as opposed to a generic fallback).
    pub exact_family: bool,
    pub(crate) data: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

/// Installed fonts, queried by the editor's family names.
pub struct FontBook {
    db: usvg::fontdb::Database,
    resolved: HashMap<(FontFamily, FontWeight), ResolvedFont>,
}

impl FontBook {
    /// A font book with no faces; add some with [`FontBook::load_font_data`].
    pub fn empty() -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
            resolved: HashMap::new(),
        }
    }

    /// Build from system fonts (optional), explicit directories and `TEXTBEHIND_FONT_DIR`.
    pub fn from_sources(system_fonts: bool, dirs: &[PathBuf]) -> Self {
        let mut book = Self::empty();
        if system_fonts {
            book.db.load_system_fonts();
        }
        for dir in dirs {
            load_fonts_from_dir(&mut book.db, dir);
        }
        if let Some(dir) = std::env::var_os(FONT_DIR_ENV) {
            load_fonts_from_dir(&mut book.db, Path::new(&dir));
        }
        tracing::debug!(faces = book.db.len(), "font book ready");
        book
    }

    /// Register a font file's bytes (TTF/OTF/TTC).
    pub fn load_font_data(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
        self.resolved.clear();
    }

    /// Number of installed faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Pick the face for `family` at `weight`.
    ///
    /// Falls back to the family's generic class, then sans-serif, then any installed face.
    pub fn resolve(
        &mut self,
        family: FontFamily,
        weight: FontWeight,
    ) -> TextBehindResult<ResolvedFont> {
        if let Some(font) = self.resolved.get(&(family, weight)) {
            return Ok(font.clone());
        }

        let (generic, substitutes) = match family.generic() {
            GenericFamily::SansSerif => (usvg::fontdb::Family::SansSerif, SANS_SUBSTITUTES),
            GenericFamily::Serif => (usvg::fontdb::Family::Serif, SERIF_SUBSTITUTES),
            GenericFamily::Monospace => (usvg::fontdb::Family::Monospace, MONO_SUBSTITUTES),
            GenericFamily::Cursive => (usvg::fontdb::Family::Cursive, SANS_SUBSTITUTES),
        };
        let mut fallback: Vec<usvg::fontdb::Family<'_>> = vec![generic];
        fallback.extend(substitutes.iter().map(|n| usvg::fontdb::Family::Name(n)));
        fallback.push(usvg::fontdb::Family::SansSerif);
        fallback.extend(SANS_SUBSTITUTES.iter().map(|n| usvg::fontdb::Family::Name(n)));

        let exact = self.query(&[usvg::fontdb::Family::Name(family.name())], weight);
        let id = exact
            .or_else(|| self.query(&fallback, weight))
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| {
                TextBehindError::raster(format!(
                    "no font face available for \"{family}\" (no fonts installed)"
                ))
            })?;

        let face = self
            .db
            .face(id)
            .ok_or_else(|| TextBehindError::raster("font face vanished from database"))?;
        let family_name = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.name().to_owned());
        let face_weight = face.weight.0;
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| {
                TextBehindError::raster(format!("could not read font data for \"{family_name}\""))
            })?;

        if exact.is_none() {
            tracing::warn!(requested = %family, used = %family_name, "font family not installed, using fallback");
        }

        let font = ResolvedFont {
            id,
            family_name,
            weight: face_weight,
            exact_family: exact.is_some(),
            data: Arc::new(data),
            index,
        };
        self.resolved.insert((family, weight), font.clone());
        Ok(font)
    }

    fn query(
        &self,
        families: &[usvg::fontdb::Family<'_>],
        weight: FontWeight,
    ) -> Option<usvg::fontdb::ID> {
        let query = usvg::fontdb::Query {
            families,
            weight: usvg::fontdb::Weight(weight.get()),
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        self.db.query(&query)
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory not readable, skipping");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to load font file");
        }
    }
}

/// Horizontal extent and vertical anchor of a single laid-out line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LineBox {
    /// Advance width of the line.
    pub(crate) width: f64,
    /// Ascent plus descent of the line.
    pub(crate) height: f64,
    /// Distance from the layout top to the middle of the em box.
    pub(crate) middle: f64,
}

/// Stateful helper for building Parley text layouts from resolved font faces.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashSet<usvg::fontdb::ID>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashSet::new(),
        }
    }

    /// Shape `text` as a single unwrapped line.
    ///
    /// Line breaks are laid out as spaces, matching how a canvas `fillText` treats them.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        weight: FontWeight,
        brush: TextBrushRgba8,
    ) -> TextBehindResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TextBehindError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        if self.registered.insert(font.id) {
            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(font.data.as_ref().clone()), None);
            if families.is_empty() {
                self.registered.remove(&font.id);
                return Err(TextBehindError::raster(format!(
                    "no font families registered from \"{}\"",
                    font.family_name
                )));
            }
        }

        let line: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight.get())),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&line);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Measure `text` without keeping the layout.
    pub(crate) fn measure(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        weight: FontWeight,
    ) -> TextBehindResult<LineBox> {
        let layout = self.layout_line(text, font, size_px, weight, TextBrushRgba8::default())?;
        Ok(line_box(&layout))
    }
}

pub(crate) fn line_box(layout: &parley::Layout<TextBrushRgba8>) -> LineBox {
    let width = f64::from(layout.width());
    match layout.lines().next() {
        Some(line) => {
            let m = line.metrics();
            LineBox {
                width,
                height: f64::from(m.ascent + m.descent),
                middle: f64::from(m.baseline - (m.ascent - m.descent) / 2.0),
            }
        }
        None => LineBox {
            width,
            height: f64::from(layout.height()),
            middle: f64::from(layout.height()) / 2.0,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
