use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::domain::{EndpointTarget, OutcomeRecord, ScenarioKind, ScenarioTags};
use crate::error::{AppError, AppResult};
use crate::http::Invoke;
use crate::sinks::RecordSink;

use super::{ConcurrencySettings, deadline_after};

/// Spawns `level` workers sharing one deadline, waits for all of them and
/// returns the sum of their request counts.
///
/// # Errors
///
/// Returns the first worker error (sink write or task failure) once every
/// worker has stopped.
pub async fn run_concurrency(
    invoker: Arc<dyn Invoke>,
    sink: Arc<RecordSink>,
    target: &EndpointTarget,
    settings: &ConcurrencySettings,
) -> AppResult<u64> {
    info!(
        "Starting concurrency={} for {}/{} ({:?})",
        settings.level, target.function_type, target.region, settings.duration
    );
    let deadline = deadline_after(settings.duration);
    let mut worker_handles = Vec::with_capacity(usize::try_from(settings.level).unwrap_or(0));
    for worker_id in 0..settings.level {
        let invoker = Arc::clone(&invoker);
        let sink = Arc::clone(&sink);
        let target = target.clone();
        let tags = ScenarioTags::new(ScenarioKind::Concurrency, &target)
            .with_worker(worker_id, settings.level);
        worker_handles.push(tokio::spawn(async move {
            worker_loop(invoker.as_ref(), &sink, &target, &tags, deadline).await
        }));
    }

    let mut total: u64 = 0;
    let mut first_error: Option<AppError> = None;
    for handle in worker_handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => Err(AppError::from(err)),
        };
        match result {
            Ok(count) => total = total.saturating_add(count),
            Err(err) => {
                warn!("Concurrency worker failed: {}", err);
                first_error.get_or_insert(err);
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }
    info!(
        "Finished concurrency={} for {}/{}: {} requests",
        settings.level, target.function_type, target.region, total
    );
    Ok(total)
}

async fn worker_loop(
    invoker: &dyn Invoke,
    sink: &RecordSink,
    target: &EndpointTarget,
    tags: &ScenarioTags,
    deadline: Instant,
) -> AppResult<u64> {
    let mut count: u64 = 0;
    while Instant::now() < deadline {
        let outcome = invoker.invoke(target).await;
        sink.append(&OutcomeRecord::new(outcome, tags.sequence(count)))
            .await?;
        count = count.saturating_add(1);
    }
    Ok(count)
}
