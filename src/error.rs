//! Error types for the answer evaluator.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while building or running the evaluator.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// None of the candidate models answered the connection probe.
    #[error("Could not initialize any model (tried: {}). Check your API key and available models.", tried.join(", "))]
    NoModelAvailable { tried: Vec<String> },

    /// HTTP server failed to bind or serve.
    #[error("Server error: {0}")]
    Server(String),

    /// The question was empty after trimming.
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}

impl EvalError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        EvalError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::LlmParse(err.to_string())
    }
}

/// Which generation step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Answer,
    Reference,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::Answer => f.write_str("Error getting answer"),
            GenerationStage::Reference => f.write_str("Error generating reference"),
        }
    }
}

/// A single generative call that failed.
///
/// This is the `Err` side of an answer or reference answer. Its display form
/// is the marker text shown to users, e.g. `Error getting answer: quota exceeded`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage}: {message}")]
pub struct GenerationError {
    pub stage: GenerationStage,
    pub message: String,
}

impl GenerationError {
    pub fn new(stage: GenerationStage, source: impl fmt::Display) -> Self {
        Self {
            stage,
            message: source.to_string(),
        }
    }
}
