//! Placement of an image on a fixed-size page
//!
//! Images are scaled uniformly, up or down, to the largest size that fits
//! inside the page margins, then centered. Nothing is cropped or stretched.
//! Coordinates use a top-left origin; [`PageGeometry::pdf_origin_y`] converts
//! to PDF's bottom-left origin.

use crate::constants::{PAGE_HEIGHT_MM, PAGE_MARGIN_PT, PAGE_WIDTH_MM, mm_to_pt};

/// Where an image is drawn on a page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    /// Fit an image with `aspect_ratio` (width / height) onto the page.
    ///
    /// The image first takes the full printable width; if that makes it too
    /// tall it is clamped to the printable height instead.
    pub fn fit(page_width: f32, page_height: f32, margin: f32, aspect_ratio: f32) -> Self {
        let max_height = page_height - 2.0 * margin;

        let mut width = page_width - 2.0 * margin;
        let mut height = width / aspect_ratio;

        if height > max_height {
            height = max_height;
            width = height * aspect_ratio;
        }

        Self {
            page_width,
            page_height,
            margin,
            x: (page_width - width) / 2.0,
            y: (page_height - height) / 2.0,
            width,
            height,
        }
    }

    /// Fit an image of `pixel_width` x `pixel_height` onto the export page
    pub fn for_image(pixel_width: u32, pixel_height: u32) -> Self {
        let (page_width, page_height) = export_page_size_pt();
        Self::fit(
            page_width,
            page_height,
            PAGE_MARGIN_PT,
            pixel_width as f32 / pixel_height as f32,
        )
    }

    /// Bottom edge of the placement measured from the page bottom
    pub fn pdf_origin_y(&self) -> f32 {
        self.page_height - self.y - self.height
    }
}

/// Export page size (width, height) in points
pub fn export_page_size_pt() -> (f32, f32) {
    (mm_to_pt(PAGE_WIDTH_MM), mm_to_pt(PAGE_HEIGHT_MM))
}
