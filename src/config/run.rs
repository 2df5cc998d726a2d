use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::args::BenchArgs;
use crate::domain::{EndpointTarget, RequestParams, ScenarioKind};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::InvokerConfig;
use crate::scenario::{BaselineSettings, ColdWarmSettings, ConcurrencySettings};

use super::loader::load_endpoints;
use super::targets::{TargetFilter, local_target, resolve_targets};

/// Validated settings for one benchmark run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub results_dir: PathBuf,
    pub scenarios: BTreeSet<ScenarioKind>,
    pub targets: Vec<EndpointTarget>,
    pub invoker: InvokerConfig,
    pub baseline: BaselineSettings,
    /// Baseline pacing applied to the local target under the `local` scenario.
    pub local: BaselineSettings,
    pub concurrency_levels: Vec<u32>,
    pub concurrency_duration: Duration,
    pub cold_warm: ColdWarmSettings,
}

impl RunConfig {
    /// Loads the endpoint config and validates every run option.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unreadable endpoint config,
    /// invalid numeric options, an empty target set or a missing token.
    pub fn from_args(args: &BenchArgs) -> AppResult<Self> {
        let scenarios: BTreeSet<ScenarioKind> = args.scenarios.iter().copied().collect();
        if scenarios.is_empty() {
            return Err(AppError::config(ConfigError::NoScenarios));
        }
        if args.concurrency_levels.contains(&0) {
            return Err(AppError::config(ConfigError::ZeroConcurrency));
        }

        let baseline = BaselineSettings {
            scenario: ScenarioKind::Baseline,
            duration: Duration::from_secs(args.baseline_duration),
            interval_min: seconds("baseline-interval-min", args.baseline_interval_min)?,
            interval_max: seconds("baseline-interval-max", args.baseline_interval_max)?,
        };
        check_order(
            ("baseline-interval-min", args.baseline_interval_min),
            ("baseline-interval-max", args.baseline_interval_max),
        )?;
        let local = BaselineSettings {
            scenario: ScenarioKind::Local,
            duration: Duration::from_secs(args.local_duration),
            interval_min: seconds("local-interval-min", args.local_interval_min)?,
            interval_max: seconds("local-interval-max", args.local_interval_max)?,
        };
        check_order(
            ("local-interval-min", args.local_interval_min),
            ("local-interval-max", args.local_interval_max),
        )?;
        let cold_warm = ColdWarmSettings {
            warm_interval: seconds("warm-interval", args.warm_interval)?,
            warm_duration: Duration::from_secs(args.warm_duration),
            idle_minutes: args.idle_minutes.clone(),
            cold_repeats: args.cold_repeats,
            idle_wait: !args.skip_idle_wait,
        };

        let token = args
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        let endpoints = load_endpoints(&args.config)?;
        let filter = TargetFilter::new(&args.function_types, &args.regions);
        let local_params = RequestParams {
            id: args.local_id.clone(),
            circle: args.local_circle.clone(),
            response_format: args.local_response_format.clone(),
        };
        let targets = resolve_targets(
            &endpoints,
            &filter,
            &scenarios,
            local_target(&args.local_url, local_params, &args.local_source_url),
            token.as_deref(),
        )?;

        Ok(Self {
            results_dir: args.results_dir.clone(),
            scenarios,
            targets,
            invoker: InvokerConfig {
                token,
                tmp_dir: args.tmp_dir.clone(),
                request_timeout: args.request_timeout,
                verify_tls: args.verify_tls,
            },
            baseline,
            local,
            concurrency_levels: args.concurrency_levels.clone(),
            concurrency_duration: Duration::from_secs(args.concurrency_duration),
            cold_warm,
        })
    }

    #[must_use]
    pub fn runs(&self, scenario: ScenarioKind) -> bool {
        self.scenarios.contains(&scenario)
    }

    /// Baseline pacing for `target`: the local settings when the `local`
    /// scenario applies to it, the baseline settings when `baseline` is
    /// selected, nothing otherwise.
    #[must_use]
    pub fn baseline_for(&self, target: &EndpointTarget) -> Option<&BaselineSettings> {
        if target.is_local() && self.runs(ScenarioKind::Local) {
            Some(&self.local)
        } else if self.runs(ScenarioKind::Baseline) {
            Some(&self.baseline)
        } else {
            None
        }
    }
}

fn seconds(field: &'static str, value: f64) -> AppResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_err| AppError::config(ConfigError::InvalidSeconds { field, value }))
}

fn check_order(min: (&'static str, f64), max: (&'static str, f64)) -> AppResult<()> {
    if min.1 > max.1 {
        return Err(AppError::config(ConfigError::IntervalOrder {
            min_field: min.0,
            max_field: max.0,
            min: min.1,
            max: max.1,
        }));
    }
    Ok(())
}
