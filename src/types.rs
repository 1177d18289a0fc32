/// Shared serializable output types.
///
/// These types are what gets written to stdout or stderr as JSON,
/// decoupled from the engine envelope.
use serde::{Deserialize, Serialize};

use crate::sandbox::SandboxError;

/// Result of `sandbox init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOutput {
    /// Directory the engine created.
    pub project: String,
    /// Command that deploys the new project.
    pub next_command: String,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `SandboxError`.
    #[must_use]
    pub fn from_sandbox_error(err: &SandboxError) -> Self {
        Self::new(err.code(), err.to_string())
    }

    /// Construct from a startup failure (configuration, logging).
    #[must_use]
    pub fn from_startup_error(err: &anyhow::Error) -> Self {
        Self::new("config_error", format!("{err:#}"))
    }

    fn new(code: &str, message: String) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let out = ErrorOutput::from_sandbox_error(&SandboxError::engine("no such project"));
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ok": false,
                "error": {"code": "engine_failed", "message": "no such project"}
            })
        );
    }

    #[test]
    fn test_startup_error_includes_context_chain() {
        let err = anyhow::anyhow!("expected `]`").context("Failed to parse config file 'c.toml'");
        let out = ErrorOutput::from_startup_error(&err);
        assert_eq!(out.error.code, "config_error");
        assert_eq!(
            out.error.message,
            "Failed to parse config file 'c.toml': expected `]`"
        );
    }
}
