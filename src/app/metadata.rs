use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::EndpointTarget;
use crate::error::{AppError, AppResult, ReportError};
use crate::report::write_text;

pub const METADATA_FILE: &str = "metadata.json";

/// Provenance of one run, written as `metadata.json` and printed on exit.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub started_at_utc: String,
    pub finished_at_utc: String,
    pub requests_total: u64,
    pub targets: Vec<EndpointTarget>,
    /// Effective options, credential excluded.
    pub args: serde_json::Value,
    pub raw: PathBuf,
    pub summary: PathBuf,
}

impl RunMetadata {
    /// Two-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_pretty_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AppError::report(ReportError::Metadata { source: err }))
    }

    pub(super) async fn write(&self, dir: &Path) -> AppResult<PathBuf> {
        let path = dir.join(METADATA_FILE);
        write_text(&path, self.to_pretty_json()?).await?;
        Ok(path)
    }
}
