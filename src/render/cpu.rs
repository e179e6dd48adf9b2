use std::sync::Arc;

use crate::assets::decode::RasterImage;
use crate::assets::text::{ResolvedFont, TextBrushRgba8};
use crate::foundation::core::{Affine, Canvas, Rgb8};
use crate::foundation::error::{TextBehindError, TextBehindResult};

fn with_ctx(
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> TextBehindResult<Vec<u8>> {
    let (width, height) = canvas_u16(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    draw(&mut ctx);

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Draw `image` stretched over the whole canvas; premultiplied RGBA8 out.
pub(crate) fn image_stretched(image: &RasterImage, canvas: Canvas) -> TextBehindResult<Vec<u8>> {
    if image.canvas() == canvas {
        return Ok(image.premul_bytes().to_vec());
    }

    let paint = rgba_premul_to_image(image)?;
    let (w, h) = (f64::from(image.width()), f64::from(image.height()));
    let scale = Affine::scale_non_uniform(f64::from(canvas.width) / w, f64::from(canvas.height) / h);
    with_ctx(canvas, |ctx| {
        ctx.set_transform(affine_to_cpu(scale));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    })
}

/// Fill every glyph run of a single-font `layout` in `color`, placed by `transform`.
pub(crate) fn glyphs(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    transform: Affine,
    color: Rgb8,
    canvas: Canvas,
) -> TextBehindResult<Vec<u8>> {
    with_ctx(canvas, |ctx| {
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    })
}

pub(crate) fn font_data(font: &ResolvedFont) -> vello_cpu::peniko::FontData {
    vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font.data.as_ref().clone()),
        font.index,
    )
}

fn canvas_u16(canvas: Canvas) -> TextBehindResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TextBehindError::raster("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TextBehindError::raster("surface height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TextBehindResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(Canvas { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TextBehindError::raster("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rgba_premul_to_image(image: &RasterImage) -> TextBehindResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(image.premul_bytes(), image.width(), image.height())?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}
