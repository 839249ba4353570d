use std::path::Path;

use image::GrayImage;
use thiserror::Error;

use crate::PageText;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("failed to render page {page}: {message}")]
    RenderError { page: usize, message: String },
    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("OCR engine error: {0}")]
    Ocr(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rasterized pages of a PDF, yielded lazily in page order.
///
/// Each page image is owned by the consumer and released as soon as it is
/// dropped, so at most one rendered page needs to be alive at a time.
pub type RasterPages<'a> = Box<dyn Iterator<Item = Result<GrayImage, BackendError>> + 'a>;

/// Trait for PDF backends.
///
/// Implementors provide the two low-level steps the extractor needs: reading
/// the native text layer and rasterizing pages for OCR. The fallback policy
/// between them lives in `docsift_ingest::DocumentTextExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Extract the native text layer of every page, in page order.
    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>, BackendError>;

    /// Render every page to an 8-bit grayscale image at `dpi`.
    fn render_pages<'a>(&'a self, path: &Path, dpi: f32) -> Result<RasterPages<'a>, BackendError>;
}

/// Trait for optical character recognition engines.
///
/// Recognizing no glyphs is not an error: engines return an empty string.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String, BackendError>;
}
