use std::path::Path;
use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::info;

use crate::args::BenchArgs;
use crate::config::RunConfig;
use crate::domain::{EndpointTarget, ScenarioKind};
use crate::error::{AppError, AppResult, ReportError};
use crate::http::{HttpInvoker, Invoke};
use crate::metrics::summarize;
use crate::report::write_summaries;
use crate::scenario::{ConcurrencySettings, run_baseline, run_cold_warm, run_concurrency};
use crate::sinks::{RecordSink, read_records};

use super::metadata::RunMetadata;

pub const RAW_RECORDS_FILE: &str = "raw.jsonl";
const RUN_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Validates `args`, runs every selected scenario against the real
/// endpoints and writes the run artifacts.
///
/// # Errors
///
/// Returns configuration errors before any request is sent, and artifact
/// I/O errors from the run itself.
pub async fn run_benchmark(args: &BenchArgs) -> AppResult<RunMetadata> {
    let config = RunConfig::from_args(args)?;
    let invoker: Arc<dyn Invoke> = Arc::new(HttpInvoker::new(config.invoker.clone())?);
    let effective_args = serde_json::to_value(args)?;
    execute_run(&config, invoker, effective_args).await
}

/// Runs the configured scenarios through `invoker`, then aggregates the
/// record stream into `summary.csv`, `summary.md` and `metadata.json`
/// inside a fresh `<results_dir>/<run_id>` directory.
///
/// # Errors
///
/// Returns an error when a run artifact cannot be created, written or read
/// back.
pub async fn execute_run(
    config: &RunConfig,
    invoker: Arc<dyn Invoke>,
    effective_args: serde_json::Value,
) -> AppResult<RunMetadata> {
    let run_id = Local::now().format(RUN_ID_FORMAT).to_string();
    let started_at = Utc::now();
    let out_dir = config.results_dir.join(&run_id);
    tokio::fs::create_dir_all(&out_dir).await.map_err(|err| {
        AppError::report(ReportError::Write {
            path: out_dir.clone(),
            source: err,
        })
    })?;
    let raw_path = out_dir.join(RAW_RECORDS_FILE);
    info!("Run {} writing records to {}", run_id, raw_path.display());

    let sink = Arc::new(RecordSink::create(&raw_path).await?);
    let mut requests_total: u64 = 0;
    for target in &config.targets {
        let count = run_target(config, &invoker, &sink, target).await?;
        requests_total = requests_total.saturating_add(count);
    }
    sink.finish().await?;

    let summary = summarize_run(&raw_path, &out_dir).await?;
    let metadata = RunMetadata {
        run_id,
        started_at_utc: started_at.to_rfc3339(),
        finished_at_utc: Utc::now().to_rfc3339(),
        requests_total,
        targets: config.targets.clone(),
        args: effective_args,
        raw: raw_path,
        summary,
    };
    let metadata_path = metadata.write(&out_dir).await?;
    info!("Run metadata written to {}", metadata_path.display());
    Ok(metadata)
}

/// Baseline (or its local alias), then every concurrency level, then
/// cold/warm, as selected.
async fn run_target(
    config: &RunConfig,
    invoker: &Arc<dyn Invoke>,
    sink: &Arc<RecordSink>,
    target: &EndpointTarget,
) -> AppResult<u64> {
    let mut total: u64 = 0;
    if let Some(settings) = config.baseline_for(target) {
        let count = run_baseline(invoker.as_ref(), sink, target, settings).await?;
        total = total.saturating_add(count);
    }
    if config.runs(ScenarioKind::Concurrency) {
        for &level in &config.concurrency_levels {
            let settings = ConcurrencySettings {
                level,
                duration: config.concurrency_duration,
            };
            let count =
                run_concurrency(Arc::clone(invoker), Arc::clone(sink), target, &settings).await?;
            total = total.saturating_add(count);
        }
    }
    if config.runs(ScenarioKind::ColdWarm) {
        let count = run_cold_warm(invoker.as_ref(), sink, target, &config.cold_warm).await?;
        total = total.saturating_add(count);
    }
    Ok(total)
}

async fn summarize_run(raw_path: &Path, out_dir: &Path) -> AppResult<std::path::PathBuf> {
    let records = read_records(raw_path).await?;
    let rows = summarize(&records);
    let summary_path = write_summaries(out_dir, &rows).await?;
    info!(
        "Summarized {} records into {} rows at {}",
        records.len(),
        rows.len(),
        summary_path.display()
    );
    Ok(summary_path)
}
