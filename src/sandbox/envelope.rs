/// The JSON envelope the engine writes to stdout in captured mode.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::SandboxError;

/// Structured engine output. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxOutput {
    /// Tabular result rows, one JSON object per row.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table: Vec<Map<String, Value>>,
    /// Transcript lines the engine would have printed to a terminal.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub captured: Vec<String>,
    /// Pre-formatted result lines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formatted: Vec<String>,
    /// Arbitrary structured result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
    /// Error message, present when the engine command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SandboxOutput {
    /// Parse an envelope from raw engine stdout.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::MalformedOutput` if `raw` is not a JSON object
    /// of the expected shape.
    pub fn parse(raw: &[u8]) -> Result<Self, SandboxError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// The engine-reported failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<SandboxError> {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(SandboxError::engine)
    }

    /// The `project` field of an object entity, as produced by `project create`.
    #[must_use]
    pub fn created_project(&self) -> Option<&str> {
        self.entity.as_ref()?.get("project")?.as_str()
    }
}
