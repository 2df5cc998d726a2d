use std::collections::BTreeSet;

use tracing::warn;
use url::Url;

use crate::domain::target::{CPU_DATA, LOCAL_REGION};
use crate::domain::{EndpointTarget, RequestParams, ScenarioKind};
use crate::error::{AppError, AppResult, ConfigError};

use super::loader::EndpointMap;

/// Function type and region filters; an empty list allows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFilter {
    pub function_types: Vec<String>,
    pub regions: Vec<String>,
}

impl TargetFilter {
    /// Drops empty entries left over from comma lists such as `--regions ""`.
    #[must_use]
    pub fn new(function_types: &[String], regions: &[String]) -> Self {
        let keep = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .collect()
        };
        Self {
            function_types: keep(function_types),
            regions: keep(regions),
        }
    }

    #[must_use]
    pub fn allows(&self, function_type: &str, region: &str) -> bool {
        self.allows_function(function_type)
            && (self.regions.is_empty() || self.regions.iter().any(|item| item == region))
    }

    #[must_use]
    pub fn allows_function(&self, function_type: &str) -> bool {
        self.function_types.is_empty() || self.function_types.iter().any(|item| item == function_type)
    }

    #[must_use]
    pub fn names_region(&self, region: &str) -> bool {
        self.regions.iter().any(|item| item == region)
    }
}

/// Remote targets of the endpoint map that pass the filter, in map order.
#[must_use]
pub fn endpoint_targets(endpoints: &EndpointMap, filter: &TargetFilter) -> Vec<EndpointTarget> {
    let mut targets = Vec::new();
    for (function_type, regions) in endpoints {
        for (region, url) in regions {
            if !filter.allows(function_type, region) {
                continue;
            }
            if let Err(err) = Url::parse(url) {
                warn!(
                    "Endpoint {}/{} has an invalid URL '{}': {}",
                    function_type, region, url, err
                );
            }
            targets.push(EndpointTarget::remote(function_type, region, url));
        }
    }
    targets
}

/// The self-hosted data endpoint: no authentication, explicit parameters
/// and a prerequisite download before every request.
#[must_use]
pub fn local_target(url: &str, params: RequestParams, source_url: &str) -> EndpointTarget {
    EndpointTarget {
        function_type: CPU_DATA.to_owned(),
        region: LOCAL_REGION.to_owned(),
        url: url.to_owned(),
        auth_required: false,
        request_params: Some(params),
        local_source_url: source_url.to_owned(),
    }
}

/// Combines the configured endpoints with the optional local target and
/// checks that something can run.
///
/// The local target is included when the `local` scenario or region is
/// requested and the function filter allows `cpu_data`.
///
/// # Errors
///
/// Returns [`ConfigError::NoTargets`] when nothing is left to run and
/// [`ConfigError::MissingToken`] when a selected remote target needs a token
/// that was not supplied.
pub fn resolve_targets(
    endpoints: &EndpointMap,
    filter: &TargetFilter,
    scenarios: &BTreeSet<ScenarioKind>,
    local: EndpointTarget,
    token: Option<&str>,
) -> AppResult<Vec<EndpointTarget>> {
    let selected = endpoint_targets(endpoints, filter);
    let local_requested =
        scenarios.contains(&ScenarioKind::Local) || filter.names_region(LOCAL_REGION);
    let local = (local_requested && filter.allows_function(CPU_DATA)).then_some(local);
    let wants_remote = scenarios.iter().any(|scenario| scenario.is_remote());

    if wants_remote && selected.is_empty() && local.is_none() {
        return Err(AppError::config(ConfigError::NoTargets));
    }
    if !wants_remote && local.is_none() {
        return Err(AppError::config(ConfigError::NoTargets));
    }
    let has_token = token.is_some_and(|value| !value.is_empty());
    if wants_remote && !has_token && selected.iter().any(|target| target.auth_required) {
        return Err(AppError::config(ConfigError::MissingToken));
    }

    let mut targets = selected;
    targets.extend(local);
    Ok(targets)
}
