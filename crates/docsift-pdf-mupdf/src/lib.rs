use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix, Page, TextPageFlags};

use docsift_core::{BackendError, PageText, PdfBackend, RasterPages};

/// PDF user space is 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that image-only code paths do not transitively
/// depend on it.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

fn open(path: &Path) -> Result<Document, BackendError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;
    Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))
}

/// Text of one page, one `\n`-terminated line per text line, in reading order.
fn page_text(page: &Page) -> Result<String, BackendError> {
    let text_page = page
        .to_text_page(TextPageFlags::empty())
        .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

    let mut text = String::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
            text.push('\n');
        }
    }
    Ok(text)
}

fn render_page(document: &Document, index: usize, scale: f32) -> Result<GrayImage, BackendError> {
    let render_err = |e: mupdf::Error| BackendError::RenderError {
        page: index,
        message: e.to_string(),
    };

    let page = document.load_page(index as i32).map_err(render_err)?;
    let matrix = Matrix::new_scale(scale, scale);
    let pixmap = page
        .to_pixmap(&matrix, &Colorspace::device_gray(), false, false)
        .map_err(render_err)?;

    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let n = pixmap.n() as usize;
    let samples = pixmap.samples();
    let pixels = (width * height) as usize;

    if samples.len() < pixels * n {
        return Err(BackendError::RenderError {
            page: index,
            message: format!(
                "pixmap has {} samples, expected {}",
                samples.len(),
                pixels * n
            ),
        });
    }

    let buffer_err = || BackendError::RenderError {
        page: index,
        message: "failed to create image buffer".into(),
    };

    // Gray pixmaps map 1:1; anything with color components goes through luma.
    if n == 1 {
        GrayImage::from_raw(width, height, samples[..pixels].to_vec()).ok_or_else(buffer_err)
    } else {
        let mut rgb = Vec::with_capacity(pixels * 3);
        for px in samples[..pixels * n].chunks_exact(n) {
            let r = px[0];
            let g = px.get(1).copied().unwrap_or(r);
            let b = px.get(2).copied().unwrap_or(r);
            rgb.extend_from_slice(&[r, g, b]);
        }
        let img = RgbImage::from_raw(width, height, rgb).ok_or_else(buffer_err)?;
        Ok(DynamicImage::ImageRgb8(img).to_luma8())
    }
}

impl PdfBackend for MupdfBackend {
    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>, BackendError> {
        let document = open(path)?;

        let mut pages = Vec::new();
        for (index, page_result) in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .enumerate()
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            pages.push(PageText {
                index,
                text: page_text(&page)?,
            });
        }

        tracing::trace!(path = %path.display(), pages = pages.len(), "read native text layer");
        Ok(pages)
    }

    fn render_pages<'a>(&'a self, path: &Path, dpi: f32) -> Result<RasterPages<'a>, BackendError> {
        let document = open(path)?;
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        let scale = dpi / POINTS_PER_INCH;

        tracing::trace!(path = %path.display(), page_count, dpi, "rendering pages");
        Ok(Box::new(
            (0..page_count.max(0) as usize).map(move |index| render_page(&document, index, scale)),
        ))
    }
}
