use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Load pattern a record was produced under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Baseline,
    Local,
    Concurrency,
    #[value(name = "cold_warm")]
    ColdWarm,
}

impl ScenarioKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::Baseline => "baseline",
            ScenarioKind::Local => "local",
            ScenarioKind::Concurrency => "concurrency",
            ScenarioKind::ColdWarm => "cold_warm",
        }
    }

    /// Scenarios that run against the configured remote endpoints.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        !matches!(self, ScenarioKind::Local)
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warm,
    Cold,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Warm => "warm",
            Phase::Cold => "cold",
        }
    }
}
