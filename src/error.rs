//! Error types for the map-eval library.

use thiserror::Error;

/// Result type for map-eval operations.
pub type Result<T> = std::result::Result<T, MapEvalError>;

/// Error types that can occur while loading labels or evaluating them.
#[derive(Error, Debug)]
pub enum MapEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A label line could not be parsed into a box record.
    #[error("Malformed record in {source_name} at line {line}: {reason}")]
    MalformedRecord {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// Invalid IoU or confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Unknown box coordinate convention.
    #[error("Invalid box format: {0}")]
    InvalidBoxFormat(String),

    /// Recall and precision sequences of different lengths.
    #[error("Curve length mismatch: {recalls} recalls vs {precisions} precisions")]
    CurveLength { recalls: usize, precisions: usize },
}

impl MapEvalError {
    /// Build a `MalformedRecord` error that is not tied to a file position.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        MapEvalError::MalformedRecord {
            source_name: "<record>".to_string(),
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attach a source name and line number to a `MalformedRecord` error.
    pub(crate) fn at(self, source: &str, line_no: usize) -> Self {
        match self {
            MapEvalError::MalformedRecord { reason, .. } => MapEvalError::MalformedRecord {
                source_name: source.to_string(),
                line: line_no,
                reason,
            },
            other => other,
        }
    }
}
