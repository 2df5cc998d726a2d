use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::info;

use crate::domain::{EndpointTarget, OutcomeRecord, Phase, ScenarioKind, ScenarioTags};
use crate::error::AppResult;
use crate::http::Invoke;
use crate::sinks::RecordSink;

use super::{ColdWarmSettings, deadline_after};

const SECONDS_PER_MINUTE: u64 = 60;

/// Keeps the target warm at a fixed interval, then probes it after each
/// idle window. Returns the total number of records written.
///
/// Warm records are numbered across the whole warm phase; cold records
/// restart at zero for every idle window.
///
/// # Errors
///
/// Returns an error when a record cannot be written to the sink.
pub async fn run_cold_warm(
    invoker: &dyn Invoke,
    sink: &RecordSink,
    target: &EndpointTarget,
    settings: &ColdWarmSettings,
) -> AppResult<u64> {
    info!(
        "Starting cold_warm warm phase for {}/{} ({:?})",
        target.function_type, target.region, settings.warm_duration
    );
    let base = ScenarioTags::new(ScenarioKind::ColdWarm, target);
    let warm_tags = base.clone().with_phase(Phase::Warm, 0);
    let deadline = deadline_after(settings.warm_duration);
    let mut total: u64 = 0;
    while Instant::now() < deadline {
        let outcome = invoker.invoke(target).await;
        sink.append(&OutcomeRecord::new(outcome, warm_tags.sequence(total)))
            .await?;
        total = total.saturating_add(1);
        sleep(settings.warm_interval).await;
    }

    for &idle in &settings.idle_minutes {
        if settings.idle_wait {
            info!(
                "Idling {} minute(s) before cold probes of {}/{}",
                idle, target.function_type, target.region
            );
            sleep(Duration::from_secs(idle.saturating_mul(SECONDS_PER_MINUTE))).await;
        }
        let cold_tags = base.clone().with_phase(Phase::Cold, idle);
        for probe in 0..settings.cold_repeats {
            let outcome = invoker.invoke(target).await;
            sink.append(&OutcomeRecord::new(outcome, cold_tags.sequence(u64::from(probe))))
                .await?;
            total = total.saturating_add(1);
        }
    }
    info!(
        "Finished cold_warm for {}/{}: {} requests",
        target.function_type, target.region, total
    );
    Ok(total)
}
