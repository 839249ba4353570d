use std::io::Write;
use std::path::Path;

use docsift_core::ExtractionResult;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Write the extracted text, or the JSON result object.
pub fn write_result(
    w: &mut dyn Write,
    result: &ExtractionResult,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        writeln!(w, "{}", serde_json::to_string_pretty(result)?)?;
    } else if !result.is_empty() {
        writeln!(w, "{}", result.extracted_text)?;
    }
    Ok(())
}

/// One-line summary of what was extracted.
pub fn print_summary(
    w: &mut dyn Write,
    path: &Path,
    result: &ExtractionResult,
    color: ColorMode,
) -> std::io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if result.is_empty() {
        let msg = format!("No text found in {}", name);
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())
        } else {
            writeln!(w, "{}", msg)
        }
    } else {
        let chars = result.extracted_text.chars().count();
        let lines = result.extracted_text.lines().count();
        let msg = format!("Extracted {} characters ({} lines) from {}", chars, lines, name);
        if color.enabled() {
            writeln!(w, "{}", msg.dimmed())
        } else {
            writeln!(w, "{}", msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_summary(text: &str) -> String {
        let mut buf = Vec::new();
        let result = ExtractionResult::from_raw(text);
        print_summary(&mut buf, Path::new("/tmp/in/scan.pdf"), &result, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn summary_counts_characters_and_lines() {
        assert_eq!(
            render_summary("INVOICE #42\nTotal: 10"),
            "Extracted 21 characters (2 lines) from scan.pdf\n"
        );
    }

    #[test]
    fn summary_for_empty_result() {
        assert_eq!(render_summary("   "), "No text found in scan.pdf\n");
    }

    #[test]
    fn json_result_shape() {
        let mut buf = Vec::new();
        write_result(&mut buf, &ExtractionResult::from_raw(" hi "), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value, serde_json::json!({ "extracted_text": "hi" }));
    }

    #[test]
    fn empty_text_result_writes_nothing() {
        let mut buf = Vec::new();
        write_result(&mut buf, &ExtractionResult::default(), false).unwrap();
        assert!(buf.is_empty());
    }
}
