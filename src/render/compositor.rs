use std::path::PathBuf;

use crate::assets::decode::RasterImage;
use crate::assets::pair::ImagePair;
use crate::assets::text::{FontBook, LineBox, TextBrushRgba8, TextLayoutEngine, line_box};
use crate::foundation::core::{Affine, Canvas, Rgb8, Size, Vec2};
use crate::foundation::error::{TextBehindError, TextBehindResult};
use crate::foundation::math::{opacity_to_u8, premul_rgba8};
use crate::layers::model::TextLayer;
use crate::render::blur::{blur_mask, shadow_kernel};
use crate::render::composite::{PixelRect, extract_region, over_in_place, over_region};
use crate::render::cpu::{font_data, glyphs, image_stretched};

#[derive(Clone, Debug, Default)]
/// Options for [`Compositor`].
pub struct ExportOpts {
    /// Optional clear color (straight RGBA8) painted beneath the background.
    pub clear_rgba: Option<[u8; 4]>,
    /// Load the host's installed fonts.
    pub system_fonts: bool,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dirs: Vec<PathBuf>,
}

impl ExportOpts {
    /// Options that load system fonts and nothing else.
    pub fn system() -> Self {
        Self {
            system_fonts: true,
            ..Self::default()
        }
    }

    pub fn with_clear_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.clear_rgba = Some(rgba);
        self
    }

    pub fn with_system_fonts(mut self, on: bool) -> Self {
        self.system_fonts = on;
        self
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }
}

/// Ratio between the image's natural width and the width it was displayed at while editing.
pub fn export_scale(natural_width: u32, displayed_width: f64) -> TextBehindResult<f64> {
    if !displayed_width.is_finite() || displayed_width <= 0.0 {
        return Err(TextBehindError::validation(format!(
            "displayed width must be finite and > 0, got {displayed_width}"
        )));
    }
    Ok(f64::from(natural_width) / displayed_width)
}

/// Renders a layer stack between the background and foreground at the image's natural size.
pub struct Compositor {
    fonts: FontBook,
    text: TextLayoutEngine,
    clear_rgba: Option<[u8; 4]>,
}

impl Compositor {
    pub fn new(opts: ExportOpts) -> Self {
        let fonts = FontBook::from_sources(opts.system_fonts, &opts.font_dirs);
        Self::with_font_book(fonts, opts)
    }

    /// Use an already populated font book; font options in `opts` are ignored.
    pub fn with_font_book(fonts: FontBook, opts: ExportOpts) -> Self {
        Self {
            fonts,
            text: TextLayoutEngine::new(),
            clear_rgba: opts.clear_rgba,
        }
    }

    pub fn font_book(&self) -> &FontBook {
        &self.fonts
    }

    pub fn font_book_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Composite `layers` for a preview that showed the foreground `displayed_width` pixels wide.
    #[tracing::instrument(skip(self, pair, layers), fields(layers = layers.len()))]
    pub fn composite(
        &mut self,
        pair: &ImagePair,
        layers: &[TextLayer],
        displayed_width: f64,
    ) -> TextBehindResult<RasterImage> {
        let scale = export_scale(pair.natural_size().width, displayed_width)?;
        self.composite_scaled(pair, layers, scale)
    }

    /// Composite with an explicit natural/displayed scale factor.
    pub fn composite_scaled(
        &mut self,
        pair: &ImagePair,
        layers: &[TextLayer],
        scale: f64,
    ) -> TextBehindResult<RasterImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TextBehindError::validation(format!(
                "export scale must be finite and > 0, got {scale}"
            )));
        }

        let canvas = pair.natural_size();
        let mut surface = vec![0u8; canvas.rgba8_len()];
        if let Some(rgba) = self.clear_rgba {
            let px = premul_rgba8(rgba);
            for d in surface.chunks_exact_mut(4) {
                d.copy_from_slice(&px);
            }
        }

        let background = image_stretched(pair.background(), canvas)?;
        over_in_place(&mut surface, &background, 255)?;

        for layer in layers {
            self.draw_layer(&mut surface, canvas, layer, scale)?;
        }

        let foreground = image_stretched(pair.foreground(), canvas)?;
        over_in_place(&mut surface, &foreground, 255)?;

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            scale,
            "composited layers"
        );
        RasterImage::from_premul_rgba8(canvas.width, canvas.height, surface)
    }

    /// Size of a layer's text box in displayed pixels, centred on its anchor.
    pub fn measure(&mut self, layer: &TextLayer) -> TextBehindResult<Size> {
        if layer.text.is_empty() {
            return Ok(Size::ZERO);
        }
        let lb = self.line_box(layer, 1.0)?;
        Ok(Size::new(lb.width, lb.height))
    }

    fn line_box(&mut self, layer: &TextLayer, scale: f64) -> TextBehindResult<LineBox> {
        let font = self.fonts.resolve(layer.font_family, layer.font_weight)?;
        self.text.measure(
            &layer.text,
            &font,
            (f64::from(layer.font_size) * scale) as f32,
            layer.font_weight,
        )
    }

    fn draw_layer(
        &mut self,
        surface: &mut [u8],
        canvas: Canvas,
        layer: &TextLayer,
        scale: f64,
    ) -> TextBehindResult<()> {
        if layer.text.is_empty() {
            return Ok(());
        }

        let font = self.fonts.resolve(layer.font_family, layer.font_weight)?;
        let size_px = (f64::from(layer.font_size) * scale) as f32;
        let layout = self.text.layout_line(
            &layer.text,
            &font,
            size_px,
            layer.font_weight,
            TextBrushRgba8 {
                r: layer.color.r,
                g: layer.color.g,
                b: layer.color.b,
                a: 255,
            },
        )?;
        let lb = line_box(&layout);

        let kernel = if layer.has_shadow() {
            shadow_kernel(f64::from(layer.shadow_blur) * scale)
        } else {
            None
        };
        // Ink is rasterized with `pad` extra pixels on every side so glyph parts outside the
        // image still cast their shadow into it.
        let pad = kernel.map_or(0, |(radius, _)| radius);
        let padded = canvas.grown(pad);

        let offset = Vec2::new(f64::from(pad), f64::from(pad));
        let anchor = canvas.percent_to_px(layer.x, layer.y);
        let transform = Affine::translate(anchor.to_vec2() + offset)
            * Affine::rotate(f64::from(layer.rotation).to_radians())
            * Affine::translate((-lb.width / 2.0, -lb.middle));

        let ink = glyphs(&layout, &font_data(&font), transform, layer.color, padded)?;
        let opacity = opacity_to_u8(layer.opacity);

        if let Some(kernel) = kernel {
            draw_shadow(surface, canvas, &ink, kernel, layer.shadow_color, opacity)?;
        }

        if pad == 0 {
            return over_in_place(surface, &ink, opacity);
        }
        let visible = PixelRect {
            x0: pad,
            y0: pad,
            x1: pad + canvas.width,
            y1: pad + canvas.height,
        };
        over_in_place(surface, &extract_region(&ink, padded.width, visible), opacity)
    }
}

/// Composite the blurred, `color`-tinted coverage of `ink` onto `surface`.
///
/// `ink` covers `canvas` grown by the kernel radius on every side.
fn draw_shadow(
    surface: &mut [u8],
    canvas: Canvas,
    ink: &[u8],
    (radius, sigma): (u32, f32),
    color: Rgb8,
    opacity: u8,
) -> TextBehindResult<()> {
    let padded = canvas.grown(radius);
    let Some(rect) = alpha_bounds(ink, padded, radius) else {
        return Ok(());
    };
    let coverage: Vec<u8> = extract_region(ink, padded.width, rect)
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    let blurred = blur_mask(&coverage, rect.width(), rect.height(), radius, sigma)?;

    let clip = PixelRect {
        x0: rect.x0.max(radius),
        y0: rect.y0.max(radius),
        x1: rect.x1.min(radius + canvas.width),
        y1: rect.y1.min(radius + canvas.height),
    };
    if clip.is_empty() {
        return Ok(());
    }

    let mut shadow = Vec::with_capacity(clip.width() as usize * clip.height() as usize * 4);
    for y in clip.y0..clip.y1 {
        let row = (y - rect.y0) as usize * rect.width() as usize;
        for x in clip.x0..clip.x1 {
            let a = blurred[row + (x - rect.x0) as usize];
            shadow.extend_from_slice(&premul_rgba8([color.r, color.g, color.b, a]));
        }
    }
    let dst = PixelRect {
        x0: clip.x0 - radius,
        y0: clip.y0 - radius,
        x1: clip.x1 - radius,
        y1: clip.y1 - radius,
    };
    over_region(surface, canvas.width, &shadow, dst, opacity)
}

/// Bounding box of non-transparent pixels, grown by `pad` and clipped to the surface.
fn alpha_bounds(bytes: &[u8], canvas: Canvas, pad: u32) -> Option<PixelRect> {
    let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
    for (i, px) in bytes.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = (i % canvas.width as usize) as u32;
        let y = (i / canvas.width as usize) as u32;
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x + 1);
        y1 = y1.max(y + 1);
    }
    if x0 == u32::MAX {
        return None;
    }
    let rect = PixelRect {
        x0: x0.saturating_sub(pad),
        y0: y0.saturating_sub(pad),
        x1: x1.saturating_add(pad).min(canvas.width),
        y1: y1.saturating_add(pad).min(canvas.height),
    };
    (!rect.is_empty()).then_some(rect)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
