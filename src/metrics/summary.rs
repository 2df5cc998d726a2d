use std::collections::BTreeMap;

use crate::domain::{OutcomeRecord, Phase, ScenarioKind};

use super::percentiles::percentile_sorted;
use super::round_to;

const RATE_PLACES: i32 = 6;
const RPS_PLACES: i32 = 4;
const SECONDS_PLACES: i32 = 6;

/// Experiment dimensions a summary row is computed over.
///
/// Field order is the row ordering of every report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub scenario: ScenarioKind,
    pub phase: Option<Phase>,
    pub function_type: String,
    pub region: String,
    pub concurrency: u32,
    pub idle_minutes: u64,
}

impl GroupKey {
    #[must_use]
    pub fn of(record: &OutcomeRecord) -> Self {
        let tags = &record.tags;
        Self {
            scenario: tags.scenario,
            phase: tags.phase,
            function_type: tags.function_type.clone(),
            region: tags.region.clone(),
            concurrency: tags.concurrency,
            idle_minutes: tags.idle_minutes.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn phase_label(&self) -> &'static str {
        self.phase.map_or("", Phase::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: GroupKey,
    pub requests: u64,
    pub success: u64,
    pub errors: u64,
    pub error_rate: f64,
    pub rps: f64,
    pub p50_s: f64,
    pub p95_s: f64,
    pub p99_s: f64,
    pub mean_s: f64,
}

/// Groups records by [`GroupKey`] and computes one row per group.
///
/// Latency statistics only consider successful records; the error rate
/// covers every record in the group.
#[must_use]
pub fn summarize(records: &[OutcomeRecord]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<GroupKey, Vec<&OutcomeRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(GroupKey::of(record)).or_default().push(record);
    }
    groups
        .into_iter()
        .map(|(key, sample)| summarize_group(key, &sample))
        .collect()
}

fn summarize_group(key: GroupKey, sample: &[&OutcomeRecord]) -> SummaryRow {
    let mut durations: Vec<f64> = sample
        .iter()
        .filter(|record| record.outcome.success)
        .map(|record| record.outcome.duration_s)
        .collect();
    durations.sort_unstable_by(f64::total_cmp);

    let requests = sample.len() as u64;
    let success = durations.len() as u64;
    let errors = requests.saturating_sub(success);
    let error_rate = if requests == 0 {
        0.0
    } else {
        errors as f64 / requests as f64
    };
    let mean = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    SummaryRow {
        key,
        requests,
        success,
        errors,
        error_rate: round_to(error_rate, RATE_PLACES),
        rps: round_to(throughput(sample.iter().copied()), RPS_PLACES),
        p50_s: round_to(percentile_sorted(&durations, 0.50), SECONDS_PLACES),
        p95_s: round_to(percentile_sorted(&durations, 0.95), SECONDS_PLACES),
        p99_s: round_to(percentile_sorted(&durations, 0.99), SECONDS_PLACES),
        mean_s: round_to(mean, SECONDS_PLACES),
    }
}

/// Requests per second over the span from the earliest start to the
/// latest end. A non-positive span yields `0.0`.
#[must_use]
pub fn throughput<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a OutcomeRecord>,
{
    let mut count: u64 = 0;
    let mut first_start = f64::INFINITY;
    let mut last_end = f64::NEG_INFINITY;
    for record in records {
        count = count.saturating_add(1);
        first_start = first_start.min(record.outcome.ts_start);
        last_end = last_end.max(record.outcome.ts_end);
    }
    let span = last_end - first_start;
    if count == 0 || !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    count as f64 / span
}
