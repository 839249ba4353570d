use std::path::Path;

pub mod config;
pub mod extractor;
pub mod tool;

pub use config::{DEFAULT_RENDER_DPI, ExtractorConfig, ExtractorConfigBuilder};
pub use extractor::DocumentTextExtractor;
pub use tool::OcrTool;
// Re-export domain types for convenience
pub use docsift_core::{ExtractError, ExtractionRequest, ExtractionResult, MediaKind};

/// Build an extractor with the default backends: MuPDF for PDFs and the
/// `tesseract` executable for OCR.
#[cfg(feature = "pdf")]
pub fn default_extractor() -> DocumentTextExtractor {
    DocumentTextExtractor::new(
        docsift_pdf_mupdf::MupdfBackend::new(),
        docsift_ocr::TesseractCli::new(),
    )
}

/// Build an extractor without PDF support; PDF inputs fail with an
/// extraction error.
#[cfg(not(feature = "pdf"))]
pub fn default_extractor() -> DocumentTextExtractor {
    DocumentTextExtractor::new(NoPdfSupport, docsift_ocr::TesseractCli::new())
}

/// Extract text from a PDF or PNG/JPEG image with the default extractor.
///
/// Dispatches on the file name:
/// - `.pdf` → native text layer, OCR of rendered pages if that is empty
/// - `.png` / `.jpg` / `.jpeg` (any case) → grayscale OCR
/// - anything else → [`ExtractError::UnsupportedFormat`]
pub fn extract_text(path: &Path) -> Result<ExtractionResult, ExtractError> {
    default_extractor().extract(path)
}

#[cfg(not(feature = "pdf"))]
struct NoPdfSupport;

#[cfg(not(feature = "pdf"))]
impl docsift_core::PdfBackend for NoPdfSupport {
    fn page_texts(
        &self,
        _path: &Path,
    ) -> Result<Vec<docsift_core::PageText>, docsift_core::BackendError> {
        Err(Self::error())
    }

    fn render_pages<'a>(
        &'a self,
        _path: &Path,
        _dpi: f32,
    ) -> Result<docsift_core::RasterPages<'a>, docsift_core::BackendError> {
        Err(Self::error())
    }
}

#[cfg(not(feature = "pdf"))]
impl NoPdfSupport {
    fn error() -> docsift_core::BackendError {
        docsift_core::BackendError::OpenError(
            "PDF support not compiled in (enable the `pdf` feature of docsift-ingest)".into(),
        )
    }
}
