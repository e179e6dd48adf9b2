use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TextBehindError, TextBehindResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cloning is cheap; pixel storage is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    canvas: Canvas,
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> TextBehindResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if bytes.len() != canvas.rgba8_len() {
            return Err(TextBehindError::raster(format!(
                "rgba8 byte length {} does not match {}x{}",
                bytes.len(),
                width,
                height
            )));
        }
        Ok(Self {
            canvas,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Wrap straight-alpha RGBA8 bytes, premultiplying them.
    pub fn from_straight_rgba8(
        width: u32,
        height: u32,
        mut bytes: Vec<u8>,
    ) -> TextBehindResult<Self> {
        premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul_rgba8(width, height, bytes)
    }

    /// An image filled with one straight-alpha RGBA8 color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> TextBehindResult<Self> {
        let canvas = Canvas::new(width, height)?;
        Self::from_straight_rgba8(width, height, rgba.repeat(canvas.pixel_count()))
    }

    /// Convert a decoded [`image::DynamicImage`].
    pub fn from_dynamic(img: image::DynamicImage) -> TextBehindResult<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_straight_rgba8(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Natural dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn premul_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Decode an encoded image (PNG, JPEG, WebP, ...) from memory.
pub fn decode_image(bytes: &[u8]) -> TextBehindResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TextBehindError::raster(format!("decode image from memory: {e}")))?;
    RasterImage::from_dynamic(dyn_img)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> TextBehindResult<RasterImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        TextBehindError::raster(format!("read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes).map_err(|e| match e {
        TextBehindError::Raster(msg) => {
            TextBehindError::raster(format!("{msg} ('{}')", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
