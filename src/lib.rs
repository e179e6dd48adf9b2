//! textbehind places editable text layers between a photo's background and its subject.
//!
//! A photo is split by a [`Segmenter`] into a background plate and a subject cutout
//! ([`ImagePair`]). Text layers live in an [`EditorState`], are moved with pointer gestures
//! ([`PointerEvent`]) and restyled through [`PropertyEdit`]s, and are shown live as a
//! [`PreviewScene`]. Export re-renders the scene at the photo's natural resolution.
//!
//! # Pipeline overview
//!
//! 1. **Segment**: `SourceImage -> ImagePair` on a worker thread ([`Session`])
//! 2. **Edit**: pointer and control input mutate the [`EditorState`]
//! 3. **Preview**: `EditorState -> PreviewScene` in percentage coordinates
//! 4. **Export**: background, text layers in store order, then foreground, composited by the
//!    [`Compositor`] and written as `edited-<unix-millis>.png`
//!
//! Positions are stored as percentages of the displayed image and font sizes in displayed
//! pixels, so export scales text by `natural_width / displayed_width` and the output does not
//! depend on the preview size beyond that ratio.
#![forbid(unsafe_code)]

mod assets;
mod editor;
mod export;
mod foundation;
mod interaction;
mod layers;
mod render;
mod segment;
mod session;

pub use assets::decode::{RasterImage, decode_image, load_image};
pub use assets::pair::ImagePair;
pub use assets::text::{FONT_DIR_ENV, FontBook, ResolvedFont};
pub use editor::controls::{PropertyEdit, PropertyPanel, SliderRange};
pub use export::png::{ExportReceipt, encode_png, export_file_name, export_png};
pub use export::sink::{DirectorySink, ExportSink, InMemorySink};
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgb8, Size, Vec2, clamp_percent};
pub use foundation::error::{SegmentationError, TextBehindError, TextBehindResult};
pub use interaction::gesture::{DragSession, PointerEvent, percent_delta};
pub use layers::model::{
    FontFamily, FontWeight, GenericFamily, LayerId, LayerPatch, MAX_FONT_SIZE, MAX_SHADOW_BLUR,
    MIN_FONT_SIZE, TextLayer, layers_from_json,
};
pub use layers::store::{EditorState, LayerEntry};
pub use render::compositor::{Compositor, ExportOpts, export_scale};
pub use render::preview::{PreviewItem, PreviewScene, PreviewText, TextMeasure, fit_contain};
pub use segment::adapter::{CutoutSegmenter, FnSegmenter, Segmenter, SourceImage};
pub use segment::command::CommandSegmenter;
pub use session::state::{LayerRetention, Session, SessionOpts, SessionPhase};
