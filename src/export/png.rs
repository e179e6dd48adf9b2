use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use image::ImageEncoder as _;

use crate::assets::decode::RasterImage;
use crate::assets::pair::ImagePair;
use crate::export::sink::ExportSink;
use crate::foundation::error::{TextBehindError, TextBehindResult};
use crate::layers::model::TextLayer;
use crate::render::compositor::Compositor;

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReceipt {
    /// `edited-<unix-millis>.png`.
    pub file_name: String,
    /// Written location, for sinks that write to disk.
    pub path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// Encoded PNG size in bytes.
    pub byte_len: usize,
}

/// File name for an export taken at `unix_millis`.
pub fn export_file_name(unix_millis: u128) -> String {
    format!("edited-{unix_millis}.png")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Encode as an 8-bit straight-alpha RGBA PNG.
pub fn encode_png(img: &RasterImage) -> TextBehindResult<Vec<u8>> {
    let rgba = img.to_straight_rgba8();
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            &rgba,
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| TextBehindError::export(format!("encode png: {e}")))?;
    Ok(out)
}

/// Composite, encode and hand the PNG to `sink`.
///
/// Nothing reaches the sink unless compositing and encoding both succeeded.
#[tracing::instrument(
    skip_all,
    fields(layers = layers.len(), displayed_width = displayed_width)
)]
pub fn export_png(
    compositor: &mut Compositor,
    pair: &ImagePair,
    layers: &[TextLayer],
    displayed_width: f64,
    sink: &mut dyn ExportSink,
) -> TextBehindResult<ExportReceipt> {
    let result = compositor
        .composite(pair, layers, displayed_width)
        .and_then(|img| Ok((encode_png(&img)?, img)))
        .and_then(|(png, img)| {
            let file_name = export_file_name(unix_millis());
            let path = sink.emit(&file_name, &png)?;
            Ok(ExportReceipt {
                file_name,
                path,
                width: img.width(),
                height: img.height(),
                byte_len: png.len(),
            })
        });

    match &result {
        Ok(receipt) => tracing::info!(
            file = %receipt.file_name,
            bytes = receipt.byte_len,
            "exported"
        ),
        Err(e) => tracing::error!(error = %e, "failed to generate export"),
    }
    result
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
