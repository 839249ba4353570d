use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ExtractError;

/// Describes a tool's interface for an agent: name, description and a JSON
/// Schema for its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error("failed to serialize tool output: {0}")]
    Output(#[from] serde_json::Error),
}

/// A capability an agent can call: anything exposing `run(input) -> output`.
///
/// Tools are synchronous and object-safe so they can be stored as
/// `Box<dyn Tool>` in a registry.
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    fn run(&self, input: Value) -> Result<Value, ToolError>;
}
