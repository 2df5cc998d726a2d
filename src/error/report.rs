use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to format report line: {source}")]
    WriteLine {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize run metadata: {source}")]
    Metadata {
        #[source]
        source: serde_json::Error,
    },
    #[error("Unterminated quoted field in '{path}' line {line}.")]
    UnterminatedQuote { path: PathBuf, line: usize },
    #[error("No rows in summary CSV '{path}'.")]
    EmptySummary { path: PathBuf },
    #[error("Failed to render chart '{path}': {message}")]
    Plot { path: PathBuf, message: String },
}
