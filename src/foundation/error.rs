/// Convenience result type used across textbehind.
pub type TextBehindResult<T> = Result<T, TextBehindError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TextBehindError {
    /// Invalid user-provided data or an operation issued in the wrong session phase.
    #[error("validation error: {0}")]
    Validation(String),

    /// The segmentation adapter failed; no image pair is available.
    #[error("segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// A source image or font could not be brought into the raster pipeline.
    #[error("raster error: {0}")]
    Raster(String),

    /// Encoding or emitting the exported file failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing layer documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TextBehindError {
    /// Build a [`TextBehindError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TextBehindError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`TextBehindError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`TextBehindError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Failure reported by a segmentation adapter.
///
/// Any of these is total: a partially segmented image is never used.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// The source could not be decoded or is not an image the adapter accepts.
    #[error("unsupported source image: {0}")]
    UnsupportedFormat(String),

    /// The adapter's runtime is missing or blocked (binary not found, sandbox restriction).
    #[error("segmentation environment unavailable: {0}")]
    Environment(String),

    /// The adapter ran but did not produce a usable cutout.
    #[error("segmentation adapter failed: {0}")]
    Adapter(String),

    /// The background worker went away without reporting a result.
    #[error("segmentation worker disconnected before reporting a result")]
    Disconnected,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
