use docsift_core::{BackendError, GrayImage, OcrEngine};

use crate::DEFAULT_LANGUAGE;

/// In-process OCR through libtesseract.
///
/// A fresh Tesseract handle is created per call: handles are not `Sync`, and
/// the extractor must stay callable from several threads at once.
#[derive(Debug, Clone)]
pub struct TesseractLib {
    language: String,
    tessdata_dir: Option<String>,
}

impl Default for TesseractLib {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            tessdata_dir: None,
        }
    }
}

impl TesseractLib {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<String>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }
}

impl OcrEngine for TesseractLib {
    fn recognize(&self, image: &GrayImage) -> Result<String, BackendError> {
        let (width, height) = image.dimensions();

        let mut tess = tesseract::Tesseract::new(
            self.tessdata_dir.as_deref(),
            Some(self.language.as_str()),
        )
        .map_err(|e| BackendError::Ocr(e.to_string()))?
        .set_frame(image.as_raw(), width as i32, height as i32, 1, width as i32)
        .map_err(|e| BackendError::Ocr(e.to_string()))?
        .recognize()
        .map_err(|e| BackendError::Ocr(e.to_string()))?;

        tess.get_text().map_err(|e| BackendError::Ocr(e.to_string()))
    }
}
