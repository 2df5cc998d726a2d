//! Run orchestration: benchmark runs and the merge/plot subcommands.
mod commands;
mod metadata;
mod runner;


pub use commands::{run_merge, run_plot};
pub use metadata::{METADATA_FILE, RunMetadata};
pub use runner::{RAW_RECORDS_FILE, execute_run, run_benchmark};
