use std::io::Write;
use std::path::Path;

use docsift_core::{
    BackendError, ExtractError, ExtractionRequest, ExtractionResult, MediaKind, OcrEngine,
    PdfBackend,
};

use crate::config::ExtractorConfig;

/// Converts PDFs and images on disk into plain text.
///
/// PDFs are read through their native text layer first; only when that layer
/// is empty (or below [`ExtractorConfig::min_native_chars`]) are the pages
/// rasterized and OCR'd. Images are converted to grayscale and OCR'd once.
///
/// The extractor keeps no state between calls and can be shared across
/// threads.
pub struct DocumentTextExtractor {
    pdf: Box<dyn PdfBackend>,
    ocr: Box<dyn OcrEngine>,
    config: ExtractorConfig,
}

impl DocumentTextExtractor {
    pub fn new(pdf: impl PdfBackend + 'static, ocr: impl OcrEngine + 'static) -> Self {
        Self {
            pdf: Box::new(pdf),
            ocr: Box::new(ocr),
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the text of the file at `path`.
    ///
    /// Fails with [`ExtractError::FileNotFound`] before anything is opened if
    /// the path does not exist, and with [`ExtractError::UnsupportedFormat`]
    /// if it is neither a `.pdf` nor a `.png`/`.jpg`/`.jpeg` file.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<ExtractionResult, ExtractError> {
        let request = ExtractionRequest::new(path.as_ref())?;
        self.extract_request(&request)
    }

    /// Extract the text for an already validated request.
    pub fn extract_request(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractError> {
        let raw = match request.kind() {
            MediaKind::Pdf => self.extract_pdf(request.path())?,
            MediaKind::Image => self.extract_image(request.path())?,
        };
        Ok(ExtractionResult::from_raw(&raw))
    }

    /// Extract the text of an uploaded file held in memory.
    ///
    /// `file_name` decides the strategy exactly as a path would. The bytes are
    /// spooled to a temporary file that is removed before this returns.
    pub fn extract_bytes(
        &self,
        data: &[u8],
        file_name: &str,
    ) -> Result<ExtractionResult, ExtractError> {
        if MediaKind::classify(Path::new(file_name)).is_none() {
            return Err(ExtractError::UnsupportedFormat(file_name.into()));
        }
        // Classification succeeded, so the name ends in a known extension.
        let suffix = file_name
            .rfind('.')
            .map(|i| &file_name[i..])
            .unwrap_or_default();

        let mut upload = tempfile::Builder::new()
            .prefix("docsift-upload-")
            .suffix(suffix)
            .tempfile()
            .map_err(BackendError::from)?;
        upload.write_all(data).map_err(BackendError::from)?;
        upload.flush().map_err(BackendError::from)?;

        tracing::debug!(file_name, bytes = data.len(), "extracting uploaded file");
        self.extract(upload.path())
    }

    fn extract_pdf(&self, path: &Path) -> Result<String, BackendError> {
        let pages = self.pdf.page_texts(path)?;
        let text: String = pages.iter().map(|p| p.text.as_str()).collect();

        let native_chars = text.trim().chars().count();
        if native_chars >= self.config.min_native_chars {
            tracing::debug!(
                path = %path.display(),
                pages = pages.len(),
                native_chars,
                "using native text layer"
            );
            return Ok(text);
        }

        tracing::debug!(
            path = %path.display(),
            pages = pages.len(),
            native_chars,
            "no usable text layer, falling back to OCR"
        );
        self.ocr_pdf(path)
    }

    fn ocr_pdf(&self, path: &Path) -> Result<String, BackendError> {
        let limit = self.config.max_ocr_pages.unwrap_or(usize::MAX);
        let mut texts = Vec::new();

        for page in self
            .pdf
            .render_pages(path, self.config.render_dpi)?
            .take(limit)
        {
            let image = page?;
            texts.push(self.ocr.recognize(&image)?);
        }

        tracing::debug!(path = %path.display(), pages = texts.len(), "OCR fallback complete");
        Ok(texts.join("\n"))
    }

    fn extract_image(&self, path: &Path) -> Result<String, BackendError> {
        // Decoder comes from the content; the extension only chose the strategy.
        let gray = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_luma8();
        tracing::debug!(
            path = %path.display(),
            width = gray.width(),
            height = gray.height(),
            "running OCR on grayscale image"
        );
        self.ocr.recognize(&gray)
    }
}
