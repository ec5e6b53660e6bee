//! Intrinsic dimensions of an encoded raster

use crate::source::SourceLocation;
use crate::types::*;
use image::ImageReader;
use std::io::Cursor;

/// Pixel width and height of the image at `source`
pub async fn probe(source: &str) -> Result<(u32, u32)> {
    let bytes = SourceLocation::parse(source)?.fetch().await?;
    probe_bytes(&bytes)
}

/// Pixel width and height of already-loaded encoded bytes.
///
/// Only the header is read. A zero-sized image is reported as a decode
/// failure so callers can always form an aspect ratio.
pub fn probe_bytes(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExportError::Decode(format!("cannot identify format: {e}")))?;

    if reader.format().is_none() {
        return Err(ExportError::Decode("unsupported image format".to_string()));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ExportError::Decode(format!("cannot read dimensions: {e}")))?;

    if width == 0 || height == 0 {
        return Err(ExportError::Decode(format!(
            "image has no area ({width}x{height})"
        )));
    }

    Ok((width, height))
}
