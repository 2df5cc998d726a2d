//! Load patterns that repeatedly invoke one target and stream every outcome
//! to the record sink as soon as it is produced.
//!
//! Each driver computes its deadline once, when it starts, and runs to
//! completion; there is no mid-scenario cancellation.
mod baseline;
mod cold_warm;
mod concurrency;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub use baseline::run_baseline;
pub use cold_warm::run_cold_warm;
pub use concurrency::run_concurrency;

use tokio::time::Instant;

use crate::domain::ScenarioKind;

/// Open-loop pacing with a uniformly random pause after every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSettings {
    pub scenario: ScenarioKind,
    pub duration: Duration,
    pub interval_min: Duration,
    pub interval_max: Duration,
}

/// Closed-loop workers issuing back-to-back requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencySettings {
    pub level: u32,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColdWarmSettings {
    pub warm_interval: Duration,
    pub warm_duration: Duration,
    /// Idle windows in minutes, visited in order.
    pub idle_minutes: Vec<u64>,
    pub cold_repeats: u32,
    /// When false the idle windows are skipped and cold probes run at once.
    pub idle_wait: bool,
}

/// Deadline `budget` from now; an unrepresentable deadline ends at once.
fn deadline_after(budget: Duration) -> Instant {
    Instant::now()
        .checked_add(budget)
        .unwrap_or_else(Instant::now)
}
