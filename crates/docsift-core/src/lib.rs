use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod tool;

// Re-export for convenience
pub use backend::{BackendError, OcrEngine, PdfBackend, RasterPages};
pub use image::GrayImage;
pub use tool::{Tool, ToolDefinition, ToolError};

/// Extensions routed to the image strategy, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Extension routed to the PDF strategy. Matched case-sensitively, so
/// `report.PDF` is not a PDF as far as classification is concerned.
pub const PDF_EXTENSION: &str = ".pdf";

/// How a file is processed, decided from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Pdf,
    Image,
}

impl MediaKind {
    /// Classify a file name or path by its suffix.
    ///
    /// Returns `None` for anything that is neither a PDF nor a PNG/JPEG image.
    pub fn classify(name: &Path) -> Option<MediaKind> {
        let name = name.to_string_lossy();
        if name.ends_with(PDF_EXTENSION) {
            return Some(MediaKind::Pdf);
        }
        let lower = name.to_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Some(MediaKind::Image);
        }
        None
    }
}

/// A validated request to extract text from one file.
///
/// Constructing one checks that the file exists and that its kind is
/// supported; nothing is opened or decoded. [`ExtractionRequest::new`] is the
/// only way to build one:
///
/// ```compile_fail
/// use docsift_core::{ExtractionRequest, MediaKind};
///
/// let request = ExtractionRequest {
///     path: "/no/such/notes.txt".into(),
///     kind: MediaKind::Pdf,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    path: PathBuf,
    kind: MediaKind,
}

impl ExtractionRequest {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let path = path.into();
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path));
        }
        match MediaKind::classify(&path) {
            Some(kind) => Ok(Self { path, kind }),
            None => Err(ExtractError::UnsupportedFormat(path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}

/// Text extracted from a document. Empty text is a legitimate "nothing found".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub extracted_text: String,
}

impl ExtractionResult {
    /// Build a result from raw extracted text, trimming surrounding whitespace.
    pub fn from_raw(text: &str) -> Self {
        Self {
            extracted_text: text.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extracted_text.is_empty()
    }
}

/// Native text layer of a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 0-based page index.
    pub index: usize,
    pub text: String,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error(
        "unsupported file format: {} (expected a PDF or a .png/.jpg/.jpeg image)",
        .0.display()
    )]
    UnsupportedFormat(PathBuf),
    #[error("extraction failed: {0}")]
    ExtractionFailure(#[from] BackendError),
}
