use std::path::PathBuf;
use std::process::Command;

use docsift_core::{BackendError, GrayImage, OcrEngine};
use image::ImageFormat;

use crate::DEFAULT_LANGUAGE;

/// OCR through the `tesseract` command-line program.
///
/// Each call writes the page to a temporary PNG, runs
/// `tesseract <png> stdout -l <lang>` and returns its stdout. The temporary
/// file is removed when the call returns, whether OCR succeeded or not.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    language: String,
    tessdata_dir: Option<PathBuf>,
    page_segmentation_mode: Option<u8>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            tessdata_dir: None,
            page_segmentation_mode: None,
        }
    }
}

impl TesseractCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or absolute path.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the language(s), e.g. `eng` or `eng+deu`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    /// Pass `--psm <mode>`; tesseract's own default (3) applies otherwise.
    pub fn with_page_segmentation_mode(mut self, mode: u8) -> Self {
        self.page_segmentation_mode = Some(mode);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Check whether the configured executable can be launched.
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<String, BackendError> {
        let input = tempfile::Builder::new()
            .prefix("docsift-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let mut cmd = Command::new(&self.command);
        cmd.arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        if let Some(psm) = self.page_segmentation_mode {
            cmd.arg("--psm").arg(psm.to_string());
        }

        tracing::trace!(
            command = %self.command,
            language = %self.language,
            width = image.width(),
            height = image.height(),
            "running tesseract"
        );
        let output = cmd
            .output()
            .map_err(|e| BackendError::Ocr(format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    // Script-based cases share one test so no other test thread forks while a
    // script is still open for writing.
    #[test]
    fn drives_the_executable_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let seen = dir.path().join("seen");
        let image = GrayImage::from_pixel(8, 4, image::Luma([255]));

        // Arguments: <png> stdout -l <lang> [--psm N]
        let ok = write_script(
            dir.path(),
            "fake-ok",
            &format!(
                "echo \"$1\" > '{}'\ntest -f \"$1\" || exit 9\nprintf 'lang=%s mode=%s %s\\n' \"$4\" \"$5\" \"$6\"",
                seen.display()
            ),
        );
        let engine = TesseractCli::new()
            .with_command(ok.to_string_lossy())
            .with_language("deu")
            .with_page_segmentation_mode(6);
        let text = engine.recognize(&image).unwrap();
        assert_eq!(text, "lang=deu mode=--psm 6\n");

        let input_path = std::fs::read_to_string(&seen).unwrap();
        let input_path = Path::new(input_path.trim());
        assert!(input_path.to_string_lossy().ends_with(".png"));
        assert!(!input_path.exists(), "temp image should be removed");

        let failing = write_script(
            dir.path(),
            "fake-fail",
            &format!("echo \"$1\" > '{}'\necho boom >&2\nexit 3", seen.display()),
        );
        let err = TesseractCli::new()
            .with_command(failing.to_string_lossy())
            .recognize(&image)
            .unwrap_err();
        match err {
            BackendError::Ocr(msg) => assert!(msg.contains("boom"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
        let input_path = std::fs::read_to_string(&seen).unwrap();
        assert!(!Path::new(input_path.trim()).exists());

        let silent = write_script(dir.path(), "fake-empty", "exit 0");
        let text = TesseractCli::new()
            .with_command(silent.to_string_lossy())
            .recognize(&image)
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn missing_executable_is_an_ocr_error() {
        let engine = TesseractCli::new().with_command("/nonexistent/docsift-tesseract");
        assert!(!engine.is_available());
        let err = engine.recognize(&GrayImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, BackendError::Ocr(_)), "{err:?}");
    }

    #[test]
    fn defaults() {
        let engine = TesseractCli::default();
        assert_eq!(engine.language(), "eng");
        assert_eq!(engine.command, "tesseract");
        assert!(engine.tessdata_dir.is_none());
    }
}
