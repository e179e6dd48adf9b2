use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::{RasterImage, decode_image, load_image};
use crate::assets::pair::ImagePair;
use crate::foundation::error::{SegmentationError, TextBehindResult};

/// The uploaded photo, kept encoded so adapters can hand it to external tools unchanged.
#[derive(Clone, Debug)]
pub struct SourceImage {
    name: String,
    bytes: Arc<Vec<u8>>,
}

impl SourceImage {
    /// `name` is used for diagnostics and to pick a file extension for external tools.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    pub fn from_path(path: &Path) -> TextBehindResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read source image '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_owned());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase file extension of `name`, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Decode the photo itself; it becomes the background plate.
    pub fn decode(&self) -> Result<RasterImage, SegmentationError> {
        decode_image(&self.bytes)
            .map_err(|e| SegmentationError::UnsupportedFormat(format!("{}: {e}", self.name)))
    }
}

/// Splits a photo into a background plate and a subject cutout.
///
/// Any failure is total; callers never see a partial pair.
pub trait Segmenter: Send + Sync {
    fn segment(&self, source: &SourceImage) -> Result<ImagePair, SegmentationError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "segmenter"
    }
}

/// Pairs the source photo with a cutout that was produced ahead of time.
#[derive(Clone, Debug)]
pub struct CutoutSegmenter {
    cutout: PathBuf,
}

impl CutoutSegmenter {
    pub fn new(cutout: impl Into<PathBuf>) -> Self {
        Self {
            cutout: cutout.into(),
        }
    }
}

impl Segmenter for CutoutSegmenter {
    fn segment(&self, source: &SourceImage) -> Result<ImagePair, SegmentationError> {
        let background = source.decode()?;
        let foreground = load_image(&self.cutout)
            .map_err(|e| SegmentationError::Adapter(format!("cutout: {e}")))?;
        Ok(ImagePair::new(background, foreground))
    }

    fn name(&self) -> &str {
        "cutout"
    }
}

/// Segmenter backed by a closure.
pub struct FnSegmenter<F> {
    f: F,
}

impl<F> FnSegmenter<F>
where
    F: Fn(&SourceImage) -> Result<ImagePair, SegmentationError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Segmenter for FnSegmenter<F>
where
    F: Fn(&SourceImage) -> Result<ImagePair, SegmentationError> + Send + Sync,
{
    fn segment(&self, source: &SourceImage) -> Result<ImagePair, SegmentationError> {
        (self.f)(source)
    }

    fn name(&self) -> &str {
        "fn"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/adapter.rs"]
mod tests;
