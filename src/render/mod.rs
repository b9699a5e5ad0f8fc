//! Blueprint page rendering.
//!
//! PDF prints are rasterized one page at a time; raster-image prints are
//! served as uploaded and never pass through here. Rendering is abstracted
//! behind `PdfPageRenderer` so the viewer, the HTTP endpoint and the tests
//! do not care whether PDFium is actually installed.

pub mod pdfium;
pub mod queue;

pub use pdfium::{MockPdfPageRenderer, PdfiumRenderer};
pub use queue::{RenderQueue, RenderTicket};

use thiserror::Error;

/// Default rendering DPI for blueprint pages.
/// 150 DPI keeps line work legible without ballooning transfer size.
pub const DEFAULT_RENDER_DPI: u32 = 150;

/// PDF points per inch (standard PDF unit).
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF is password-protected")]
    PdfEncrypted,

    #[error("Failed to render page {page}: {reason}")]
    PdfRendering { page: usize, reason: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Render task failed: {0}")]
    TaskJoin(String),
}

// ═══════════════════════════════════════════════════════════
// Device classes & render options
// ═══════════════════════════════════════════════════════════

/// Which kind of client the page is rendered for.
///
/// Mobile canvases fail out-of-memory well below desktop limits, so the
/// maximum bitmap dimension is device-dependent. Marker positions survive
/// the difference because they are percentages of the displayed box, not
/// bitmap pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// Maximum dimension (width or height) for rendered page bitmaps.
    pub fn max_dimension_px(&self) -> u32 {
        match self {
            Self::Desktop => 4096,
            Self::Mobile => 2048,
        }
    }
}

impl std::str::FromStr for DeviceClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            _ => Err(()),
        }
    }
}

/// Options for one page render.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub dpi: u32,
    pub max_dimension_px: u32,
}

impl RenderOptions {
    pub fn for_device(device: DeviceClass) -> Self {
        Self {
            dpi: DEFAULT_RENDER_DPI,
            max_dimension_px: device.max_dimension_px(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::for_device(DeviceClass::Desktop)
    }
}

// ═══════════════════════════════════════════════════════════
// Renderer abstraction
// ═══════════════════════════════════════════════════════════

/// PDF page rendering abstraction (allows mocking for tests).
///
/// `page_index` is 0-based; marker `page_number`s are 1-based and are
/// translated by the caller.
pub trait PdfPageRenderer: Send + Sync {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, RenderError>;

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Compute pixel dimensions for rendering, applying the dimension guard.
///
/// Returns (width_px, height_px), both clamped to [1, max_dimension_px].
/// Preserves aspect ratio when capping.
pub(crate) fn compute_render_dimensions(
    width_points: f32,
    height_points: f32,
    options: &RenderOptions,
) -> (u32, u32) {
    let max_px = options.max_dimension_px;
    let scale = options.dpi as f32 / POINTS_PER_INCH;
    let raw_w = (width_points * scale).max(1.0);
    let raw_h = (height_points * scale).max(1.0);

    let max_dim = raw_w.max(raw_h);
    if max_dim > max_px as f32 {
        let ratio = max_px as f32 / max_dim;
        let w = ((raw_w * ratio) as u32).max(1).min(max_px);
        let h = ((raw_h * ratio) as u32).max(1).min(max_px);
        (w, h)
    } else {
        (raw_w as u32, raw_h as u32)
    }
}
