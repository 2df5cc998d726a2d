use std::path::PathBuf;

use crate::domain::target::{CIRCLE, LOCAL_SOURCE_URL, RESPONSE_FORMAT};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("faasbench/", env!("CARGO_PKG_VERSION"));

pub(super) const DEFAULT_CONFIG_PATH: &str = "benchmarks/config/endpoints.json";
pub(super) const DEFAULT_RESULTS_DIR: &str = "benchmarks/results";
pub(super) const DEFAULT_MERGE_OUTPUT: &str = "benchmarks/results/multi_node_summary.csv";
pub(super) const DEFAULT_PLOTS_DIR: &str = "benchmarks/plots";

pub(super) const DEFAULT_FUNCTION_TYPES: &str = "nohup,cpu_data";
pub(super) const DEFAULT_SCENARIOS: &str = "baseline,concurrency,cold_warm";
pub(super) const DEFAULT_CONCURRENCY_LEVELS: &str = "1,10,50";
pub(super) const DEFAULT_IDLE_MINUTES: &str = "15,60";
pub(super) const DEFAULT_REQUEST_TIMEOUT: &str = "300s";

pub(super) const DEFAULT_LOCAL_URL: &str = "http://localhost:8080/ska/datasets/soda";
pub(super) const DEFAULT_LOCAL_ID: &str = "ivo://src.skao.org/datasets/fits?PTF10tce.fits";
pub(super) const DEFAULT_LOCAL_SOURCE_URL: &str = LOCAL_SOURCE_URL;
pub(super) const DEFAULT_LOCAL_CIRCLE: &str = CIRCLE;
pub(super) const DEFAULT_LOCAL_RESPONSE_FORMAT: &str = RESPONSE_FORMAT;

/// Scratch directory for per-request files, under the system temp dir.
pub(super) fn default_tmp_dir() -> PathBuf {
    std::env::temp_dir().join("faasbench")
}
