use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Serialize, Serializer};

use crate::domain::ScenarioKind;

use super::defaults::{
    DEFAULT_CONCURRENCY_LEVELS, DEFAULT_CONFIG_PATH, DEFAULT_FUNCTION_TYPES, DEFAULT_IDLE_MINUTES,
    DEFAULT_LOCAL_CIRCLE, DEFAULT_LOCAL_ID, DEFAULT_LOCAL_RESPONSE_FORMAT,
    DEFAULT_LOCAL_SOURCE_URL, DEFAULT_LOCAL_URL, DEFAULT_MERGE_OUTPUT, DEFAULT_PLOTS_DIR,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESULTS_DIR, DEFAULT_SCENARIOS, default_tmp_dir,
};
use super::parsers::{MergeInput, parse_duration_arg, parse_merge_input};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Merge per-node summary CSVs into one table with a client_node column
    Merge(MergeArgs),
    /// Render charts from a summary CSV
    Plot(PlotArgs),
}

#[derive(Debug, Args, Clone)]
pub struct MergeArgs {
    /// Summary to merge as node_name=path/to/summary.csv (repeatable)
    #[arg(long = "input", required = true, value_parser = parse_merge_input)]
    pub inputs: Vec<MergeInput>,

    /// Merged CSV path
    #[arg(long, default_value = DEFAULT_MERGE_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Path to summary.csv
    pub summary_csv: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(long = "output-dir", default_value = DEFAULT_PLOTS_DIR)]
    pub output_dir: PathBuf,
}

/// Benchmark run options. Without a subcommand the binary runs a benchmark.
#[derive(Debug, Parser, Clone, Serialize)]
#[clap(
    version,
    about = "Benchmark suite for HTTP-invoked function endpoints: baseline, concurrency and cold/warm latency runs."
)]
pub struct BenchArgs {
    #[command(subcommand)]
    #[serde(skip)]
    pub command: Option<Command>,

    /// Endpoint config (.json or .toml): function type -> region -> URL
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory that receives one sub-directory per run
    #[arg(long = "results-dir", default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Scratch directory for downloaded and prefetched files
    #[arg(long = "tmp-dir", default_value_os_t = default_tmp_dir())]
    pub tmp_dir: PathBuf,

    /// Function types to benchmark (comma list, empty for all)
    #[arg(long = "function-types", value_delimiter = ',', default_value = DEFAULT_FUNCTION_TYPES)]
    pub function_types: Vec<String>,

    /// Regions to benchmark (comma list, empty for all)
    #[arg(long, value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Scenarios to run (comma list of baseline, local, concurrency, cold_warm)
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_SCENARIOS)]
    pub scenarios: Vec<ScenarioKind>,

    /// Baseline duration in seconds
    #[arg(long = "baseline-duration", default_value_t = 600)]
    pub baseline_duration: u64,

    /// Minimum pause between baseline requests, in seconds
    #[arg(long = "baseline-interval-min", default_value_t = 1.0)]
    pub baseline_interval_min: f64,

    /// Maximum pause between baseline requests, in seconds
    #[arg(long = "baseline-interval-max", default_value_t = 2.0)]
    pub baseline_interval_max: f64,

    /// Concurrency levels (comma list)
    #[arg(long = "concurrency-levels", value_delimiter = ',', default_value = DEFAULT_CONCURRENCY_LEVELS)]
    pub concurrency_levels: Vec<u32>,

    /// Duration of each concurrency level, in seconds
    #[arg(long = "concurrency-duration", default_value_t = 300)]
    pub concurrency_duration: u64,

    /// Pause between warm-phase requests, in seconds
    #[arg(long = "warm-interval", default_value_t = 5.0)]
    pub warm_interval: f64,

    /// Warm phase duration in seconds
    #[arg(long = "warm-duration", default_value_t = 300)]
    pub warm_duration: u64,

    /// Idle windows before cold probes, in minutes (comma list)
    #[arg(long = "idle-minutes", value_delimiter = ',', default_value = DEFAULT_IDLE_MINUTES)]
    pub idle_minutes: Vec<u64>,

    /// Cold probes issued after each idle window
    #[arg(long = "cold-repeats", default_value_t = 20)]
    pub cold_repeats: u32,

    /// Do not sleep during cold idle windows
    #[arg(long = "skip-idle-wait")]
    pub skip_idle_wait: bool,

    /// URL of the self-hosted data endpoint
    #[arg(long = "local-url", default_value = DEFAULT_LOCAL_URL)]
    pub local_url: String,

    /// Input file fetched before every local data request
    #[arg(long = "local-source-url", default_value = DEFAULT_LOCAL_SOURCE_URL)]
    pub local_source_url: String,

    /// Dataset ID sent to the local endpoint
    #[arg(long = "local-id", default_value = DEFAULT_LOCAL_ID)]
    pub local_id: String,

    /// Cutout circle sent to the local endpoint
    #[arg(long = "local-circle", default_value = DEFAULT_LOCAL_CIRCLE)]
    pub local_circle: String,

    /// Response format requested from the local endpoint
    #[arg(long = "local-response-format", default_value = DEFAULT_LOCAL_RESPONSE_FORMAT)]
    pub local_response_format: String,

    /// Local scenario duration in seconds
    #[arg(long = "local-duration", default_value_t = 600)]
    pub local_duration: u64,

    /// Minimum pause between local requests, in seconds
    #[arg(long = "local-interval-min", default_value_t = 1.0)]
    pub local_interval_min: f64,

    /// Maximum pause between local requests, in seconds
    #[arg(long = "local-interval-max", default_value_t = 2.0)]
    pub local_interval_max: f64,

    /// Bearer token for authenticated endpoints
    #[arg(long, env = "SKA_TOKEN", hide_env_values = true)]
    #[serde(skip)]
    pub token: Option<String>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", value_parser = parse_duration_arg, default_value = DEFAULT_REQUEST_TIMEOUT)]
    #[serde(serialize_with = "serialize_secs")]
    pub request_timeout: Duration,

    /// Verify TLS certificates of the benchmarked endpoints
    #[arg(long = "verify-tls")]
    pub verify_tls: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

fn serialize_secs<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}
