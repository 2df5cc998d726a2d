use crate::error::AppResult;
use crate::metrics::{ColdWarmDelta, SummaryRow};

use super::format::{format_float, write_line};

const TABLE_HEADERS: [&str; 12] = [
    "scenario",
    "phase",
    "function_type",
    "region",
    "concurrency",
    "idle_minutes",
    "requests",
    "errors",
    "rps",
    "p50_s",
    "p95_s",
    "p99_s",
];

/// Renders `summary.md`: the main table followed by the cold/warm deltas.
///
/// # Errors
///
/// Returns an error when a line cannot be formatted.
pub fn render_summary_markdown(rows: &[SummaryRow], deltas: &[ColdWarmDelta]) -> AppResult<String> {
    let mut output = String::new();
    write_line(&mut output, "# Benchmark summary")?;
    write_line(&mut output, "")?;
    if rows.is_empty() {
        write_line(&mut output, "No data collected.")?;
        return Ok(output);
    }

    write_line(&mut output, &format!("| {} |", TABLE_HEADERS.join(" | ")))?;
    write_line(
        &mut output,
        &format!("|{}|", vec!["---"; TABLE_HEADERS.len()].join("|")),
    )?;
    for row in rows {
        let cells = [
            row.key.scenario.as_str().to_owned(),
            row.key.phase_label().to_owned(),
            row.key.function_type.clone(),
            row.key.region.clone(),
            row.key.concurrency.to_string(),
            row.key.idle_minutes.to_string(),
            row.requests.to_string(),
            row.errors.to_string(),
            format_float(row.rps),
            format_float(row.p50_s),
            format_float(row.p95_s),
            format_float(row.p99_s),
        ];
        write_line(&mut output, &format!("| {} |", cells.join(" | ")))?;
    }

    write_line(&mut output, "")?;
    write_line(&mut output, "## Cold vs warm delta")?;
    write_line(&mut output, "")?;
    write_line(&mut output, "| function_type | region | idle_minutes | delta_p95_s |")?;
    write_line(&mut output, "|---|---|---:|---:|")?;
    for delta in deltas {
        write_line(
            &mut output,
            &format!(
                "| {} | {} | {} | {:.6} |",
                delta.function_type, delta.region, delta.idle_minutes, delta.delta_p95_s
            ),
        )?;
    }
    Ok(output)
}
