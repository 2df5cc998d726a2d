use std::path::PathBuf;

use tracing::info;

use crate::args::{MergeArgs, PlotArgs};
use crate::error::{AppError, AppResult, ReportError};
use crate::report::{merge_summaries, read_csv_table, render_charts};

/// Merges per-node summaries into `args.output`. Returns the row count.
///
/// # Errors
///
/// Returns an error when an input cannot be read or the output written.
pub async fn run_merge(args: &MergeArgs) -> AppResult<usize> {
    merge_summaries(&args.inputs, &args.output).await
}

/// Renders charts for `args.summary_csv` into `args.output_dir`.
///
/// # Errors
///
/// Returns an error when the summary is unreadable or has no rows, or a
/// chart cannot be rendered.
pub async fn run_plot(args: &PlotArgs) -> AppResult<Vec<PathBuf>> {
    let table = read_csv_table(&args.summary_csv).await?;
    if table.rows.is_empty() {
        return Err(AppError::report(ReportError::EmptySummary {
            path: args.summary_csv.clone(),
        }));
    }
    let output_dir = args.output_dir.clone();
    let charts = tokio::task::spawn_blocking(move || render_charts(&table, &output_dir)).await??;
    info!("Rendered {} chart(s)", charts.len());
    Ok(charts)
}
