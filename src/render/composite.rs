use crate::foundation::error::{TextBehindError, TextBehindResult};
use crate::foundation::math::mul_div255_u8;

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over of one premultiplied pixel, with `src` scaled by `opacity`.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: u8) -> PremulRgba8 {
    if opacity == 0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(opacity);
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite an equally sized premultiplied buffer over `dst`.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8], opacity: u8) -> TextBehindResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TextBehindError::raster(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if opacity == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Pixel rectangle `[x0, x1) x [y0, y1)` inside a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PixelRect {
    pub(crate) fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub(crate) fn height(self) -> u32 {
        self.y1 - self.y0
    }

    pub(crate) fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Copy `rect` out of a `width`-wide RGBA8 surface.
pub(crate) fn extract_region(src: &[u8], width: u32, rect: PixelRect) -> Vec<u8> {
    let row_len = rect.width() as usize * 4;
    let mut out = Vec::with_capacity(row_len * rect.height() as usize);
    for y in rect.y0..rect.y1 {
        let start = ((y as usize) * (width as usize) + rect.x0 as usize) * 4;
        out.extend_from_slice(&src[start..start + row_len]);
    }
    out
}

/// Composite a region buffer (as produced by [`extract_region`]) back over `dst` at `rect`.
pub(crate) fn over_region(
    dst: &mut [u8],
    width: u32,
    region: &[u8],
    rect: PixelRect,
    opacity: u8,
) -> TextBehindResult<()> {
    let row_len = rect.width() as usize * 4;
    if region.len() != row_len * rect.height() as usize {
        return Err(TextBehindError::raster(
            "region buffer does not match its rectangle",
        ));
    }
    for (row, y) in region.chunks_exact(row_len).zip(rect.y0..rect.y1) {
        let start = ((y as usize) * (width as usize) + rect.x0 as usize) * 4;
        over_in_place(&mut dst[start..start + row_len], row, opacity)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
