use std::time::Duration;

use rand::Rng;
use tokio::time::{Instant, sleep};
use tracing::info;

use crate::domain::{EndpointTarget, OutcomeRecord, ScenarioTags};
use crate::error::AppResult;
use crate::http::Invoke;
use crate::sinks::RecordSink;

use super::{BaselineSettings, deadline_after};

/// Runs a single request stream until the deadline, pausing a random
/// interval after each attempt. Returns the number of records written.
///
/// # Errors
///
/// Returns an error when a record cannot be written to the sink.
pub async fn run_baseline(
    invoker: &dyn Invoke,
    sink: &RecordSink,
    target: &EndpointTarget,
    settings: &BaselineSettings,
) -> AppResult<u64> {
    info!(
        "Starting {} for {}/{} ({:?})",
        settings.scenario, target.function_type, target.region, settings.duration
    );
    let deadline = deadline_after(settings.duration);
    let tags = ScenarioTags::new(settings.scenario, target);
    let mut request_id: u64 = 0;
    while Instant::now() < deadline {
        let outcome = invoker.invoke(target).await;
        sink.append(&OutcomeRecord::new(outcome, tags.sequence(request_id)))
            .await?;
        request_id = request_id.saturating_add(1);
        sleep(jitter(settings.interval_min, settings.interval_max)).await;
    }
    info!(
        "Finished {} for {}/{}: {} requests",
        settings.scenario, target.function_type, target.region, request_id
    );
    Ok(request_id)
}

/// Uniform pause in `[min, max]`.
pub(super) fn jitter(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    rand::thread_rng().gen_range(min..=max)
}
