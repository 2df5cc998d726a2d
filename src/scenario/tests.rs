use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::{TempDir, tempdir};

use super::*;
use crate::domain::{EndpointTarget, Outcome, OutcomeRecord, Phase};
use crate::http::Invoke;
use crate::sinks::{RecordSink, read_records};

/// Answers every attempt after a fixed simulated latency.
struct FakeInvoker {
    latency: Duration,
    calls: AtomicU64,
}

impl FakeInvoker {
    fn new(latency: Duration) -> Self {
        Self {
            latency,
            calls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Invoke for FakeInvoker {
    async fn invoke(&self, _target: &EndpointTarget) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        Outcome {
            ts_start: 0.0,
            ts_end: self.latency.as_secs_f64(),
            timestamp: String::new(),
            duration_s: self.latency.as_secs_f64(),
            request_duration_s: self.latency.as_secs_f64(),
            prefetch_duration_s: 0.0,
            http_code: 200,
            bytes: 2,
            exit_code: 0,
            success: true,
            error: None,
            diagnostic: String::new(),
            output_sample: "ok".to_owned(),
            command: "curl -s --get -o /dev/null <URL>".to_owned(),
        }
    }
}

fn run_paused_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn target() -> EndpointTarget {
    EndpointTarget::remote("nohup", "eu", "https://eu.example/fn")
}

async fn open_sink() -> Result<(TempDir, Arc<RecordSink>), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let sink = RecordSink::create(&dir.path().join("raw.jsonl"))
        .await
        .map_err(|err| format!("create sink failed: {}", err))?;
    Ok((dir, Arc::new(sink)))
}

async fn written(sink: &RecordSink) -> Result<Vec<OutcomeRecord>, String> {
    sink.finish()
        .await
        .map_err(|err| format!("finish failed: {}", err))?;
    read_records(sink.path())
        .await
        .map_err(|err| format!("read failed: {}", err))
}

#[test]
fn baseline_numbers_requests_without_gaps() -> Result<(), String> {
    run_paused_test(async {
        let (_dir, sink) = open_sink().await?;
        let invoker = FakeInvoker::new(Duration::from_millis(100));
        let settings = BaselineSettings {
            scenario: ScenarioKind::Baseline,
            duration: Duration::from_secs(10),
            interval_min: Duration::from_millis(500),
            interval_max: Duration::from_millis(1500),
        };

        let count = run_baseline(&invoker, &sink, &target(), &settings)
            .await
            .map_err(|err| format!("baseline failed: {}", err))?;
        let records = written(&sink).await?;

        if count == 0 || count != records.len() as u64 {
            return Err(format!("count {} vs {} records", count, records.len()));
        }
        // At least 0.6s per iteration, at most 1.6s.
        if !(6..=17).contains(&count) {
            return Err(format!("pacing ignored: {} requests in 10s", count));
        }
        for (expected, record) in (0u64..).zip(&records) {
            let tags = &record.tags;
            if tags.request_id != expected || tags.concurrency != 1 || tags.worker_id != 0 {
                return Err(format!("unexpected tags at {}: {:?}", expected, tags));
            }
            if tags.scenario != ScenarioKind::Baseline || tags.phase.is_some() {
                return Err(format!("unexpected scenario tags: {:?}", tags));
            }
        }
        Ok(())
    })
}

#[test]
fn local_alias_tags_records_as_local() -> Result<(), String> {
    run_paused_test(async {
        let (_dir, sink) = open_sink().await?;
        let invoker = FakeInvoker::new(Duration::from_millis(10));
        let settings = BaselineSettings {
            scenario: ScenarioKind::Local,
            duration: Duration::from_secs(3),
            interval_min: Duration::from_secs(1),
            interval_max: Duration::from_secs(1),
        };
        run_baseline(&invoker, &sink, &target(), &settings)
            .await
            .map_err(|err| format!("local failed: {}", err))?;
        let records = written(&sink).await?;
        if records.is_empty()
            || records
                .iter()
                .any(|record| record.tags.scenario != ScenarioKind::Local)
        {
            return Err(format!("unexpected records: {:?}", records));
        }
        Ok(())
    })
}

#[test]
fn concurrency_sums_worker_counts() -> Result<(), String> {
    run_paused_test(async {
        let (_dir, sink) = open_sink().await?;
        let fake = Arc::new(FakeInvoker::new(Duration::from_millis(250)));
        let invoker: Arc<dyn Invoke> = fake.clone();
        let settings = ConcurrencySettings {
            level: 5,
            duration: Duration::from_secs(2),
        };

        let total = run_concurrency(invoker, Arc::clone(&sink), &target(), &settings)
            .await
            .map_err(|err| format!("concurrency failed: {}", err))?;
        let records = written(&sink).await?;

        if total != records.len() as u64 || total != fake.calls.load(Ordering::SeqCst) {
            return Err(format!("total {} vs {} records", total, records.len()));
        }
        if records.iter().any(|record| record.tags.concurrency != 5) {
            return Err("every record must carry the concurrency level".to_owned());
        }
        for worker_id in 0..5u32 {
            let ids: Vec<u64> = records
                .iter()
                .filter(|record| record.tags.worker_id == worker_id)
                .map(|record| record.tags.request_id)
                .collect();
            if ids.is_empty() || ids != (0..ids.len() as u64).collect::<Vec<u64>>() {
                return Err(format!("worker {} sequence broken: {:?}", worker_id, ids));
            }
        }
        Ok(())
    })
}

#[test]
fn cold_warm_tags_phases_and_idle_windows() -> Result<(), String> {
    run_paused_test(async {
        let (_dir, sink) = open_sink().await?;
        let invoker = FakeInvoker::new(Duration::from_millis(50));
        let settings = ColdWarmSettings {
            warm_interval: Duration::from_secs(5),
            warm_duration: Duration::from_secs(20),
            idle_minutes: vec![15, 60],
            cold_repeats: 3,
            idle_wait: true,
        };

        let started = tokio::time::Instant::now();
        let total = run_cold_warm(&invoker, &sink, &target(), &settings)
            .await
            .map_err(|err| format!("cold_warm failed: {}", err))?;
        if started.elapsed() < Duration::from_secs(75 * 60) {
            return Err("idle windows were not waited out".to_owned());
        }
        let records = written(&sink).await?;
        if total != records.len() as u64 {
            return Err(format!("total {} vs {} records", total, records.len()));
        }

        let warm: Vec<u64> = records
            .iter()
            .filter(|record| record.tags.phase == Some(Phase::Warm))
            .map(|record| record.tags.request_id)
            .collect();
        if warm.len() != 4 || warm != (0..4).collect::<Vec<u64>>() {
            return Err(format!("unexpected warm sequence: {:?}", warm));
        }
        for idle in [15u64, 60] {
            let cold: Vec<u64> = records
                .iter()
                .filter(|record| {
                    record.tags.phase == Some(Phase::Cold) && record.tags.idle_minutes == Some(idle)
                })
                .map(|record| record.tags.request_id)
                .collect();
            if cold != vec![0, 1, 2] {
                return Err(format!("unexpected cold probes for {}m: {:?}", idle, cold));
            }
        }
        if records
            .iter()
            .any(|record| record.tags.scenario != ScenarioKind::ColdWarm)
        {
            return Err("every record must be tagged cold_warm".to_owned());
        }
        Ok(())
    })
}

#[test]
fn skipped_idle_wait_probes_immediately() -> Result<(), String> {
    run_paused_test(async {
        let (_dir, sink) = open_sink().await?;
        let invoker = FakeInvoker::new(Duration::ZERO);
        let settings = ColdWarmSettings {
            warm_interval: Duration::from_secs(1),
            warm_duration: Duration::from_secs(1),
            idle_minutes: vec![60],
            cold_repeats: 2,
            idle_wait: false,
        };
        let started = tokio::time::Instant::now();
        let total = run_cold_warm(&invoker, &sink, &target(), &settings)
            .await
            .map_err(|err| format!("cold_warm failed: {}", err))?;
        if started.elapsed() > Duration::from_secs(60) {
            return Err("idle wait should have been skipped".to_owned());
        }
        if total != 3 {
            return Err(format!("expected one warm and two cold, got {}", total));
        }
        Ok(())
    })
}
