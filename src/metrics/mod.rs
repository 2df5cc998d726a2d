//! Aggregation of raw outcome records into grouped summary statistics.
mod delta;
mod percentiles;
mod summary;


pub use delta::{ColdWarmDelta, cold_warm_deltas};
pub use percentiles::{percentile, percentile_sorted};
pub use summary::{GroupKey, SummaryRow, summarize, throughput};

/// Rounds to `places` decimal digits, half away from zero.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
