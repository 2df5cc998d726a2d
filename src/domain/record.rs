use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::run::{Phase, ScenarioKind};
use super::target::EndpointTarget;

/// Status code recorded when no HTTP response was received.
pub const HTTP_CODE_NONE: u16 = 0;
/// Maximum number of characters kept from a response body.
pub const OUTPUT_SAMPLE_CHARS: usize = 200;

/// Seconds since the Unix epoch with microsecond resolution.
#[must_use]
pub fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Result of a single invocation attempt, before scenario tagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub ts_start: f64,
    pub ts_end: f64,
    pub timestamp: String,
    pub duration_s: f64,
    pub request_duration_s: f64,
    pub prefetch_duration_s: f64,
    #[serde(with = "http_code_format")]
    pub http_code: u16,
    pub bytes: u64,
    pub exit_code: i32,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub diagnostic: String,
    #[serde(default)]
    pub output_sample: String,
    #[serde(default)]
    pub command: String,
}

impl Outcome {
    /// Exit status success and a 2xx/3xx status code.
    #[must_use]
    pub const fn is_success(exit_code: i32, http_code: u16) -> bool {
        exit_code == 0 && http_code >= 200 && http_code < 400
    }

    #[must_use]
    pub fn http_code_label(&self) -> String {
        format!("{:03}", self.http_code)
    }
}

/// Experiment dimensions attached by the scenario driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioTags {
    pub scenario: ScenarioKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub function_type: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_minutes: Option<u64>,
    #[serde(default)]
    pub worker_id: u32,
    #[serde(default)]
    pub request_id: u64,
}

const fn default_concurrency() -> u32 {
    1
}

impl ScenarioTags {
    #[must_use]
    pub fn new(scenario: ScenarioKind, target: &EndpointTarget) -> Self {
        Self {
            scenario,
            phase: None,
            function_type: target.function_type.clone(),
            region: target.region.clone(),
            url: target.url.clone(),
            concurrency: 1,
            idle_minutes: None,
            worker_id: 0,
            request_id: 0,
        }
    }

    #[must_use]
    pub const fn with_phase(mut self, phase: Phase, idle_minutes: u64) -> Self {
        self.phase = Some(phase);
        self.idle_minutes = Some(idle_minutes);
        self
    }

    #[must_use]
    pub const fn with_worker(mut self, worker_id: u32, concurrency: u32) -> Self {
        self.worker_id = worker_id;
        self.concurrency = concurrency;
        self
    }

    /// Copy of these tags for the given per-worker sequence number.
    #[must_use]
    pub fn sequence(&self, request_id: u64) -> Self {
        Self {
            request_id,
            ..self.clone()
        }
    }
}

/// One line of the raw record stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(flatten)]
    pub tags: ScenarioTags,
}

impl OutcomeRecord {
    #[must_use]
    pub const fn new(outcome: Outcome, tags: ScenarioTags) -> Self {
        Self { outcome, tags }
    }
}

/// `http_code` is written as a zero-padded string (`"200"`, `"000"`).
mod http_code_format {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S>(code: &u16, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:03}", code))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<u16, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse::<u16>().map_err(D::Error::custom)
    }
}
