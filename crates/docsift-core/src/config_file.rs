use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub ocr: Option<OcrConfig>,
    pub pdf: Option<PdfConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub language: Option<String>,
    /// Name or path of the `tesseract` executable.
    pub tesseract_cmd: Option<String>,
    /// Directory holding `*.traineddata` files.
    pub tessdata_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    pub render_dpi: Option<f32>,
    pub max_ocr_pages: Option<usize>,
    pub min_native_chars: Option<usize>,
}

/// Platform config directory path: `<config_dir>/docsift/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docsift").join("config.toml"))
}

/// Load config by cascading CWD `.docsift.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".docsift.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_ocr = base.ocr.unwrap_or_default();
    let overlay_ocr = overlay.ocr.unwrap_or_default();
    let base_pdf = base.pdf.unwrap_or_default();
    let overlay_pdf = overlay.pdf.unwrap_or_default();

    ConfigFile {
        ocr: Some(OcrConfig {
            language: overlay_ocr.language.or(base_ocr.language),
            tesseract_cmd: overlay_ocr.tesseract_cmd.or(base_ocr.tesseract_cmd),
            tessdata_dir: overlay_ocr.tessdata_dir.or(base_ocr.tessdata_dir),
        }),
        pdf: Some(PdfConfig {
            render_dpi: overlay_pdf.render_dpi.or(base_pdf.render_dpi),
            max_ocr_pages: overlay_pdf.max_ocr_pages.or(base_pdf.max_ocr_pages),
            min_native_chars: overlay_pdf.min_native_chars.or(base_pdf.min_native_chars),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let toml_str = "[ocr]\nlanguage = \"deu\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.ocr.unwrap().language.as_deref(), Some("deu"));
        assert!(parsed.pdf.is_none());
    }

    #[test]
    fn round_trip_toml() {
        let config = ConfigFile {
            pdf: Some(PdfConfig {
                render_dpi: Some(300.0),
                max_ocr_pages: Some(12),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn merge_overlay_wins_and_base_fills_gaps() {
        let base = ConfigFile {
            ocr: Some(OcrConfig {
                language: Some("eng".into()),
                tesseract_cmd: Some("/opt/bin/tesseract".into()),
                ..Default::default()
            }),
            pdf: Some(PdfConfig {
                render_dpi: Some(150.0),
                ..Default::default()
            }),
        };
        let overlay = ConfigFile {
            ocr: Some(OcrConfig {
                language: Some("fra".into()),
                ..Default::default()
            }),
            pdf: None,
        };

        let merged = merge(base, overlay);
        let ocr = merged.ocr.unwrap();
        assert_eq!(ocr.language.as_deref(), Some("fra"));
        assert_eq!(ocr.tesseract_cmd.as_deref(), Some("/opt/bin/tesseract"));
        assert!(ocr.tessdata_dir.is_none());
        assert_eq!(merged.pdf.unwrap().render_dpi, Some(150.0));
    }

    #[test]
    fn load_from_missing_or_invalid_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[pdf\nrender_dpi = ").unwrap();
        assert!(load_from_path(&bad).is_none());
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pdf]\nmax_ocr_pages = 3\nmin_native_chars = 20\n").unwrap();
        let pdf = load_from_path(&path).unwrap().pdf.unwrap();
        assert_eq!(pdf.max_ocr_pages, Some(3));
        assert_eq!(pdf.min_native_chars, Some(20));
    }
}
