//! Multi-page PDF assembly, one image per page
//!
//! Per-image work (transcode to PNG, probe) is started for every image up
//! front. Pages are still appended strictly in input order: page `i` is only
//! added once pages `0..i` exist.

use crate::constants::{DOCUMENT_TITLE, IMAGE_EMBED_DPI, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::handles::{HandleStore, TransientHandle};
use crate::layout::PageGeometry;
use crate::probe::probe_bytes;
use crate::transcode::{decode, transcode};
use crate::types::*;
use futures::TryStreamExt;
use futures::stream::FuturesOrdered;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, RawImage, RawImageData, RawImageFormat,
    XObjectTransform,
};

/// An image ready to be placed: lossless PNG bytes plus their dimensions
struct PreparedPage {
    index: usize,
    png: TransientHandle,
    pixel_width: u32,
    pixel_height: u32,
}

/// Build one PDF with a page per image, in input order
pub async fn compose_document(images: &[ImageResource], handles: &HandleStore) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ExportError::Packaging("document has no pages".to_string()));
    }

    let mut pending: FuturesOrdered<_> = images
        .iter()
        .enumerate()
        .map(|(index, image)| prepare_page(index, image, handles))
        .collect();

    let mut doc = PdfDocument::new(DOCUMENT_TITLE);

    while let Some(page) = pending.try_next().await? {
        append_page(&mut doc, page)?;
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        log::debug!("PDF writer: {warning:?}");
    }

    if bytes.is_empty() {
        return Err(ExportError::Packaging(
            "PDF writer produced no bytes".to_string(),
        ));
    }

    log::debug!("Composed {} page(s), {} bytes", images.len(), bytes.len());
    Ok(bytes)
}

async fn prepare_page(
    index: usize,
    image: &ImageResource,
    handles: &HandleStore,
) -> Result<PreparedPage> {
    let asset = transcode(&image.source_location, RasterFormat::Png)
        .await
        .map_err(|e| ExportError::at_index(index, e))?;

    let png = handles.acquire(asset.buffer);
    // On failure `png` is dropped here, which releases it
    let (pixel_width, pixel_height) =
        probe_bytes(png.bytes()).map_err(|e| ExportError::at_index(index, e))?;

    log::debug!("Page {index}: {pixel_width}x{pixel_height} px");

    Ok(PreparedPage {
        index,
        png,
        pixel_width,
        pixel_height,
    })
}

fn append_page(doc: &mut PdfDocument, page: PreparedPage) -> Result<()> {
    let PreparedPage {
        index,
        png,
        pixel_width,
        pixel_height,
    } = page;

    if doc.pages.len() != index {
        return Err(ExportError::Packaging(format!(
            "page {index} arrived with {} page(s) in the document",
            doc.pages.len()
        )));
    }

    let pixels = decode(png.bytes())
        .map_err(|e| ExportError::at_index(index, e))?
        .to_rgba8();
    png.release();

    let raw = RawImage {
        pixels: RawImageData::U8(pixels.into_raw()),
        width: pixel_width as usize,
        height: pixel_height as usize,
        data_format: RawImageFormat::RGBA8,
        tag: Vec::new(),
    };
    let image_id = doc.add_image(&raw);

    let geometry = PageGeometry::for_image(pixel_width, pixel_height);
    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(geometry.x)),
            translate_y: Some(Pt(geometry.pdf_origin_y())),
            scale_x: Some(geometry.width / pixel_width as f32),
            scale_y: Some(geometry.height / pixel_height as f32),
            dpi: Some(IMAGE_EMBED_DPI),
            ..Default::default()
        },
    }];

    doc.pages
        .push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
    Ok(())
}
