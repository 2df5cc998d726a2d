use std::collections::BTreeMap;

use crate::domain::{Phase, ScenarioKind};

use super::summary::SummaryRow;

/// Extra p95 latency of a cold cell over the warm cell of the same endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ColdWarmDelta {
    pub function_type: String,
    pub region: String,
    pub idle_minutes: u64,
    pub delta_p95_s: f64,
}

/// Pairs every cold cell with its warm counterpart.
///
/// Cold cells without a warm cell for the same function and region are
/// skipped. The result is ordered by function, region and idle minutes.
#[must_use]
pub fn cold_warm_deltas(rows: &[SummaryRow]) -> Vec<ColdWarmDelta> {
    let mut warm: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut cold: BTreeMap<(&str, &str, u64), f64> = BTreeMap::new();
    for row in rows {
        if row.key.scenario != ScenarioKind::ColdWarm {
            continue;
        }
        let function_type = row.key.function_type.as_str();
        let region = row.key.region.as_str();
        match row.key.phase {
            Some(Phase::Warm) => {
                warm.entry((function_type, region)).or_insert(row.p95_s);
            }
            Some(Phase::Cold) => {
                cold.entry((function_type, region, row.key.idle_minutes))
                    .or_insert(row.p95_s);
            }
            None => {}
        }
    }

    cold.into_iter()
        .filter_map(|((function_type, region, idle_minutes), cold_p95)| {
            let warm_p95 = warm.get(&(function_type, region))?;
            Some(ColdWarmDelta {
                function_type: function_type.to_owned(),
                region: region.to_owned(),
                idle_minutes,
                delta_p95_s: cold_p95 - warm_p95,
            })
        })
        .collect()
}
