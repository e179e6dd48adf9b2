use std::path::Path;

use crate::assets::decode::{RasterImage, load_image};
use crate::foundation::core::Canvas;
use crate::foundation::error::TextBehindResult;

/// Output of segmentation: the original photo plus the subject cutout.
///
/// Both images are immutable once produced. The natural size of the pair is the foreground's;
/// a background of a different size is stretched to it at export time.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePair {
    background: RasterImage,
    foreground: RasterImage,
}

impl ImagePair {
    pub fn new(background: RasterImage, foreground: RasterImage) -> Self {
        if background.canvas() != foreground.canvas() {
            tracing::warn!(
                background = ?background.canvas(),
                foreground = ?foreground.canvas(),
                "background and foreground sizes differ; background will be stretched"
            );
        }
        Self {
            background,
            foreground,
        }
    }

    /// Load both halves from image files.
    pub fn load(background: &Path, foreground: &Path) -> TextBehindResult<Self> {
        let bg = load_image(background)?;
        let fg = load_image(foreground)?;
        Ok(Self::new(bg, fg))
    }

    pub fn background(&self) -> &RasterImage {
        &self.background
    }

    pub fn foreground(&self) -> &RasterImage {
        &self.foreground
    }

    /// Natural (export) size.
    pub fn natural_size(&self) -> Canvas {
        self.foreground.canvas()
    }
}
