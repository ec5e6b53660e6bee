//! Raster transcoding between source encodings and PNG/JPEG
//!
//! PNG sources declared as such are passed through untouched when PNG is
//! requested. Everything else is decoded to a pixel surface and re-encoded;
//! JPEG output is flattened onto white first since it carries no alpha.

use crate::constants::{JPEG_BACKGROUND, JPEG_QUALITY};
use crate::source::SourceLocation;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Transcode the image at `source` into `target`
pub async fn transcode(source: &str, target: RasterFormat) -> Result<TranscodedAsset> {
    let location = SourceLocation::parse(source)?;

    if target == RasterFormat::Png && location.is_declared_png() {
        let buffer = location.fetch().await?;
        log::debug!("PNG passthrough ({} bytes)", buffer.len());
        return Ok(TranscodedAsset {
            buffer,
            mime_type: target.mime_type(),
        });
    }

    let encoded = location.fetch().await?;
    let surface = decode(&encoded)?;
    drop(encoded);
    tokio::task::yield_now().await;

    let buffer = encode(surface, target)?;
    log::debug!(
        "Transcoded to {} ({} bytes)",
        target.mime_type(),
        buffer.len()
    );

    Ok(TranscodedAsset {
        buffer,
        mime_type: target.mime_type(),
    })
}

/// Decode encoded bytes into a pixel surface at intrinsic size
pub(crate) fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(ExportError::Decode("source is empty".to_string()));
    }
    image::load_from_memory(bytes).map_err(|e| ExportError::Decode(e.to_string()))
}

/// Encode a surface, consuming it so it is released once encoding ends
pub(crate) fn encode(surface: DynamicImage, target: RasterFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match target {
        RasterFormat::Png => {
            surface
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                .map_err(|e| ExportError::Encode(format!("PNG: {e}")))?;
        }
        RasterFormat::Jpeg => {
            let flattened = flatten_onto_white(&surface);
            drop(surface);
            let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            flattened
                .write_with_encoder(encoder)
                .map_err(|e| ExportError::Encode(format!("JPEG: {e}")))?;
        }
    }

    if buffer.is_empty() {
        return Err(ExportError::Encode(format!(
            "{} encoder produced no bytes",
            target.mime_type()
        )));
    }

    Ok(buffer)
}

/// Paint an opaque white canvas and draw `surface` over it
fn flatten_onto_white(surface: &DynamicImage) -> DynamicImage {
    let pixels = surface.to_rgba8();
    let mut canvas = RgbaImage::from_pixel(pixels.width(), pixels.height(), Rgba(JPEG_BACKGROUND));
    image::imageops::overlay(&mut canvas, &pixels, 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}
