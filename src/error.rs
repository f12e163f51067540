//! Error types
//!
//! Every failure in the core is recoverable: capture errors block gameplay
//! behind a permission prompt, provider errors fall back to built-in
//! content, malformed questions are dropped.

use std::path::PathBuf;

use thiserror::Error;

use crate::app::AppPhase;

/// Camera could not be started or stopped streaming
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("camera stream ended")]
    StreamEnded,
}

impl CaptureError {
    /// Whether the user can fix this by granting access
    pub fn needs_permission(&self) -> bool {
        matches!(self, CaptureError::PermissionDenied)
    }
}

/// Question content could not be fetched
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read questions from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider returned no questions")]
    Empty,
}

/// A question that violates the provider contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,
    #[error("expected {expected} answer options, got {actual}")]
    WrongOptionCount { expected: usize, actual: usize },
    #[error("correct index {index} out of range for {options} options")]
    CorrectIndexOutOfRange { index: i64, options: usize },
    #[error("answer option {0} is empty")]
    EmptyOption(usize),
}

/// Configuration could not be loaded or is inconsistent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// App flow driven out of order, or a session that could not start
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot begin a session from {phase:?}")]
    WrongPhase { phase: AppPhase },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
