use docsift_core::config_file::ConfigFile;

/// Rasterization resolution used when none is configured (pdf2image's default).
pub const DEFAULT_RENDER_DPI: f32 = 200.0;

const MIN_RENDER_DPI: f32 = 36.0;
const MAX_RENDER_DPI: f32 = 1200.0;

/// Runtime configuration for [`DocumentTextExtractor`](crate::DocumentTextExtractor).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Resolution pages are rendered at before OCR.
    pub(crate) render_dpi: f32,
    /// Upper bound on pages OCR'd when a PDF has no text layer. `None` means all pages.
    pub(crate) max_ocr_pages: Option<usize>,
    /// Trimmed native text must have at least this many characters to skip OCR.
    pub(crate) min_native_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            render_dpi: DEFAULT_RENDER_DPI,
            max_ocr_pages: None,
            min_native_chars: 1,
        }
    }
}

impl ExtractorConfig {
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    pub fn render_dpi(&self) -> f32 {
        self.render_dpi
    }

    pub fn max_ocr_pages(&self) -> Option<usize> {
        self.max_ocr_pages
    }

    pub fn min_native_chars(&self) -> usize {
        self.min_native_chars
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    render_dpi: Option<f32>,
    max_ocr_pages: Option<usize>,
    min_native_chars: Option<usize>,
}

impl ExtractorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from the `[pdf]` section of a config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let pdf = config.pdf.clone().unwrap_or_default();
        Self {
            render_dpi: pdf.render_dpi,
            max_ocr_pages: pdf.max_ocr_pages,
            min_native_chars: pdf.min_native_chars,
        }
    }

    /// Clamped to 36..=1200 dpi.
    pub fn render_dpi(mut self, dpi: f32) -> Self {
        self.render_dpi = Some(dpi);
        self
    }

    /// Cap the OCR fallback at `pages` pages. Pass `0` for no cap.
    pub fn max_ocr_pages(mut self, pages: usize) -> Self {
        self.max_ocr_pages = Some(pages);
        self
    }

    /// Values below 1 are raised to 1: an empty text layer never skips OCR.
    pub fn min_native_chars(mut self, chars: usize) -> Self {
        self.min_native_chars = Some(chars);
        self
    }

    pub fn build(self) -> ExtractorConfig {
        let defaults = ExtractorConfig::default();
        ExtractorConfig {
            render_dpi: self
                .render_dpi
                .filter(|dpi| dpi.is_finite())
                .map(|dpi| dpi.clamp(MIN_RENDER_DPI, MAX_RENDER_DPI))
                .unwrap_or(defaults.render_dpi),
            max_ocr_pages: self.max_ocr_pages.filter(|&n| n > 0),
            min_native_chars: self
                .min_native_chars
                .map(|n| n.max(1))
                .unwrap_or(defaults.min_native_chars),
        }
    }
}
