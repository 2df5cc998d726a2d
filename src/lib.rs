//! Core library for the `faasbench` CLI.
//!
//! The crate drives load patterns (baseline, fixed concurrency, cold/warm
//! cycling) against HTTP-invoked function endpoints, streams one JSON line
//! per request attempt, and aggregates the stream into percentile summaries.
//! The `faasbench` binary is the primary interface; library APIs may evolve
//! with it.
pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod scenario;
pub mod sinks;
