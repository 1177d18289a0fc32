/// Errors from the sandbox domain layer.
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while driving the sandbox engine.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The engine entry script is not present in the sandbox directory.
    #[error("Sandbox support is not installed (no engine at '{}')", path.display())]
    EngineNotInstalled {
        /// Where the engine entry script was expected.
        path: PathBuf,
    },

    /// No `node` executable could be located.
    #[error("Could not find a 'node' executable on PATH; set CLOUDCTL_NODE or [sandbox].node")]
    NodeNotFound,

    /// The engine process could not be started.
    #[error("Failed to start '{}': {source}", program.display())]
    Spawn {
        /// The program that failed to spawn.
        program: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The engine ran and reported a failure.
    #[error("{message}")]
    EngineFailed {
        /// Message as reported by the engine (possibly rewritten).
        message: String,
    },

    /// The engine exited cleanly but its output was not a valid envelope.
    #[error("Unexpected output from the sandbox engine: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// I/O failure while relaying engine output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit code mapping for `SandboxError` variants.
impl SandboxError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EngineFailed { .. } => 1,
            Self::EngineNotInstalled { .. } | Self::NodeNotFound => 3,
            Self::Spawn { .. } | Self::MalformedOutput(_) | Self::Io(_) => 4,
        }
    }

    /// Machine-readable error code (snake_case) for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EngineNotInstalled { .. } => "engine_not_installed",
            Self::NodeNotFound => "node_not_found",
            Self::Spawn { .. } => "spawn_failed",
            Self::EngineFailed { .. } => "engine_failed",
            Self::MalformedOutput(_) => "malformed_output",
            Self::Io(_) => "io_error",
        }
    }

    /// Shorthand for an `EngineFailed` error.
    #[must_use]
    pub fn engine(message: impl Into<String>) -> Self {
        Self::EngineFailed {
            message: message.into(),
        }
    }
}
