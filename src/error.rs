use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the processing pipeline. All of these are recoverable
/// at the invocation boundary: a failed operation leaves previously loaded
/// tables untouched and the caller can retry with corrected inputs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A data line could not be converted into a numeric row.
    #[error("{0}")]
    Parse(String),

    /// The operation needs at least one row.
    #[error("table has no rows")]
    EmptyTable,

    /// Crop bounds (or a row's own time fields) do not form a valid
    /// calendar datetime.
    #[error("invalid time range: {0}")]
    InvalidRange(String),

    /// Threshold must be a finite number; any real value is otherwise legal.
    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
