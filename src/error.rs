//! Error types for the synthrun CLI.
//!
//! Uses thiserror for derive macros. Every variant is terminal for the run;
//! nothing is retried or recovered locally.

use crate::engine::Stage;
use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for synthrun operations.
#[derive(Error, Debug)]
pub enum SynthError {
    /// A required environment variable is not set at all.
    #[error("missing required environment variable {key}")]
    MissingConfiguration { key: &'static str },

    /// An environment variable is set but its value cannot be used.
    #[error("invalid value for environment variable {key}: {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },

    /// The engine process could not be started.
    #[error("failed to launch synthesis engine '{command}': {detail}")]
    EngineUnavailable { command: String, detail: String },

    /// The engine ran and rejected the design at one of the pipeline stages.
    #[error(
        "synthesis engine failed during {stage} (stage {} of {}): {detail}",
        .stage.ordinal(),
        Stage::ALL.len()
    )]
    EngineFailure { stage: Stage, detail: String },

    /// Local scratch or report file handling failed.
    #[error("{context} '{}': {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SynthError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SynthError::MissingConfiguration { .. } => exit_codes::CONFIG_ERROR,
            SynthError::InvalidConfiguration { .. } => exit_codes::CONFIG_ERROR,
            SynthError::EngineFailure { .. } => exit_codes::ENGINE_FAILURE,
            SynthError::EngineUnavailable { .. } => exit_codes::ENVIRONMENT_FAILURE,
            SynthError::Io { .. } => exit_codes::ENVIRONMENT_FAILURE,
        }
    }

    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for synthrun operations.
pub type Result<T> = std::result::Result<T, SynthError>;
