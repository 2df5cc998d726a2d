use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read endpoint config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML endpoint config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON endpoint config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .json or .toml.")]
    UnsupportedExtension { ext: String },
    #[error("Endpoint config must have .json or .toml extension.")]
    MissingExtension,
    #[error("No endpoints selected.")]
    NoTargets,
    #[error("SKA_TOKEN is required for non-local endpoints.")]
    MissingToken,
    #[error("No scenarios selected.")]
    NoScenarios,
    #[error("Concurrency levels must be >= 1.")]
    ZeroConcurrency,
    #[error("'{field}' must be a finite, non-negative number of seconds (got {value}).")]
    InvalidSeconds { field: &'static str, value: f64 },
    #[error("'{min_field}' ({min}) must not exceed '{max_field}' ({max}).")]
    IntervalOrder {
        min_field: &'static str,
        max_field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("Invalid merge input '{value}'. Expected node_name=path/to/summary.csv.")]
    InvalidMergeInput { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Duration must be > 0.")]
    DurationZero,
}
