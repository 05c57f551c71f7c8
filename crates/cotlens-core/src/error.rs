//! Error types for cotlens

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used across the cotlens crates
pub type CotResult<T> = std::result::Result<T, CotError>;

/// Errors raised while loading, aggregating or rendering run data.
///
/// Missing keys inside an input record are never an error; they default.
/// Only missing inputs and malformed content end up here.
#[derive(Debug, Error)]
pub enum CotError {
    /// No metrics file matched the search pattern under a root
    #[error("metrics.json not found under: {} (pattern: {pattern})", .root.display())]
    MetricsNotFound { root: PathBuf, pattern: String },

    /// Neither predictions.jsonl nor predictions.json exists
    #[error("No predictions file found in {}", .0.display())]
    PredictionsNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Not enough common examples: found {found}, need {needed}")]
    NotEnoughExamples { found: usize, needed: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON content; `line` is 1-based when known
    #[error("Failed to parse {}{}: {message}", .path.display(), .line.map(|l| format!(" (line {})", l)).unwrap_or_default())]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("CSV error on {}: {message}", .path.display())]
    Csv { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

impl CotError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(path: impl AsRef<Path>, line: Option<usize>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.to_string(),
        }
    }

    pub fn csv(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn chart(message: impl ToString) -> Self {
        Self::Chart(message.to_string())
    }
}
