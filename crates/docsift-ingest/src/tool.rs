use serde::Deserialize;
use serde_json::Value;

use docsift_core::{Tool, ToolDefinition, ToolError};

use crate::DocumentTextExtractor;

#[derive(Debug, Deserialize)]
struct OcrInput {
    file_path: String,
}

/// `ocr_reader`: extracts raw text from a PDF or image file for an agent.
///
/// Input is `{"file_path": "..."}`, output `{"extracted_text": "..."}`.
pub struct OcrTool {
    extractor: DocumentTextExtractor,
}

impl OcrTool {
    pub const NAME: &'static str = "ocr_reader";

    pub fn new(extractor: DocumentTextExtractor) -> Self {
        Self { extractor }
    }
}

impl Tool for OcrTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Extracts raw text from a PDF or image file using OCR and direct text \
                          extraction methods."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path to the PDF or image file."
                    }
                },
                "required": ["file_path"]
            }),
        }
    }

    fn run(&self, input: Value) -> Result<Value, ToolError> {
        let input: OcrInput =
            serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        tracing::debug!(tool = Self::NAME, file_path = %input.file_path, "running tool");
        let result = self.extractor.extract(&input.file_path)?;
        Ok(serde_json::to_value(result)?)
    }
}
