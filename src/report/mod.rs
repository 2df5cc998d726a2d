//! Report artifacts: summary CSV and markdown, merged multi-node tables and
//! PNG charts.
mod charts;
mod csv;
mod format;
mod markdown;
mod merge;

#[cfg(test)]
mod tests;

pub use charts::render_charts;
pub use csv::{CsvTable, SUMMARY_HEADERS, read_csv_table, render_summary_csv, write_csv_table};
pub use markdown::render_summary_markdown;
pub use merge::{CLIENT_NODE_COLUMN, merge_summaries};

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ReportError};
use crate::metrics::{SummaryRow, cold_warm_deltas};

pub const SUMMARY_CSV: &str = "summary.csv";
pub const SUMMARY_MARKDOWN: &str = "summary.md";

/// Writes `summary.csv` and `summary.md` into `dir`, returning the CSV path.
///
/// # Errors
///
/// Returns an error when either file cannot be written.
pub async fn write_summaries(dir: &Path, rows: &[SummaryRow]) -> AppResult<PathBuf> {
    let csv_path = dir.join(SUMMARY_CSV);
    write_text(&csv_path, render_summary_csv(rows)).await?;
    let markdown = render_summary_markdown(rows, &cold_warm_deltas(rows))?;
    write_text(&dir.join(SUMMARY_MARKDOWN), markdown).await?;
    Ok(csv_path)
}

pub(crate) async fn write_text(path: &Path, content: String) -> AppResult<()> {
    tokio::fs::write(path, content).await.map_err(|err| {
        AppError::report(ReportError::Write {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
