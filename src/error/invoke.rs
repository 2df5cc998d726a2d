use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to create temp directory '{path}': {source}")]
    CreateTmpDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
