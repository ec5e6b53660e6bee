//! Fixed export parameters
//!
//! None of these are user-configurable; the only user choice is the
//! export format.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Document Page
// =============================================================================

/// Page width in millimeters (A4 portrait)
pub const PAGE_WIDTH_MM: f32 = 210.0;

/// Page height in millimeters (A4 portrait)
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margin kept clear on every side of a page (points)
pub const PAGE_MARGIN_PT: f32 = 20.0;

/// Resolution at which images are embedded, so one pixel maps to one point
/// before scaling
pub const IMAGE_EMBED_DPI: f32 = 72.0;

/// Title written into the document metadata
pub const DOCUMENT_TITLE: &str = "Image Export";

// =============================================================================
// Raster Encoding
// =============================================================================

/// JPEG quality (0-100), the 0.9 quality factor
pub const JPEG_QUALITY: u8 = 90;

/// Background painted under images before JPEG encoding
pub const JPEG_BACKGROUND: [u8; 4] = [255, 255, 255, 255];

// =============================================================================
// User Notification
// =============================================================================

/// The one message shown to a user when an export fails
pub const EXPORT_FAILED_NOTICE: &str = "Download failed. Please try again.";
