//! OCR engines
//!
//! Implementations of [`docsift_core::OcrEngine`]:
//! - [`TesseractCli`] drives the `tesseract` executable (always available)
//! - [`TesseractLib`] links libtesseract in-process (`tesseract` feature)

mod cli;
#[cfg(feature = "tesseract")]
mod libtess;

pub use cli::TesseractCli;
#[cfg(feature = "tesseract")]
pub use libtess::TesseractLib;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "eng";
