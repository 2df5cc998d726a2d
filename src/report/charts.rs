use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::error::{AppError, AppResult, ReportError};

use super::csv::CsvTable;

const CHART_SIZE: (u32, u32) = (1050, 600);
const AXIS_HEADROOM: f64 = 1.1;
const PERCENT: f64 = 100.0;

type Series = Vec<(f64, f64)>;

/// Renders the concurrency/p95 and throughput/error-rate charts for every
/// function, region and scenario in a summary table. Returns the written
/// paths, in render order.
///
/// # Errors
///
/// Returns an error when the output directory cannot be created or a chart
/// fails to render.
pub fn render_charts(table: &CsvTable, out_dir: &Path) -> AppResult<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|err| {
        AppError::report(ReportError::Write {
            path: out_dir.to_path_buf(),
            source: err,
        })
    })?;

    let mut written = Vec::new();
    for ((function_type, region), points) in concurrency_series(table) {
        let path = out_dir.join(format!("concurrency_vs_p95_{}_{}.png", function_type, region));
        let caption = format!("Concurrency vs P95 - {}/{}", function_type, region);
        draw_line_chart(&path, &caption, ("Concurrency", "P95 latency (s)"), &points)
            .map_err(|err| plot_error(&path, err.as_ref()))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    for ((function_type, region, scenario), points) in error_series(table) {
        let path = out_dir.join(format!(
            "rps_vs_errors_{}_{}_{}.png",
            function_type, region, scenario
        ));
        let caption = format!("Req/s vs errors - {}/{}/{}", function_type, region, scenario);
        draw_line_chart(&path, &caption, ("Req/s", "Error rate (%)"), &points)
            .map_err(|err| plot_error(&path, err.as_ref()))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// p95 by concurrency level for every function/region of the concurrency rows.
fn concurrency_series(table: &CsvTable) -> BTreeMap<(String, String), Series> {
    let mut by_key: BTreeMap<(String, String), Series> = BTreeMap::new();
    for row in &table.rows {
        if table.cell(row, "scenario") != "concurrency" {
            continue;
        }
        let key = (
            table.cell(row, "function_type").to_owned(),
            table.cell(row, "region").to_owned(),
        );
        let concurrency = to_float(table.cell(row, "concurrency")).trunc();
        let p95 = to_float(table.cell(row, "p95_s"));
        by_key.entry(key).or_default().push((concurrency, p95));
    }
    sort_by_x(by_key)
}

/// Error rate in percent by throughput for every function/region/scenario.
fn error_series(table: &CsvTable) -> BTreeMap<(String, String, String), Series> {
    let mut by_key: BTreeMap<(String, String, String), Series> = BTreeMap::new();
    for row in &table.rows {
        let key = (
            table.cell(row, "function_type").to_owned(),
            table.cell(row, "region").to_owned(),
            table.cell(row, "scenario").to_owned(),
        );
        let rps = to_float(table.cell(row, "rps"));
        let error_pct = PERCENT * to_float(table.cell(row, "error_rate"));
        by_key.entry(key).or_default().push((rps, error_pct));
    }
    sort_by_x(by_key)
}

fn sort_by_x<K: Ord>(mut series: BTreeMap<K, Series>) -> BTreeMap<K, Series> {
    for points in series.values_mut() {
        points.sort_by(|left, right| left.0.total_cmp(&right.0));
    }
    series
}

/// Unparseable cells plot as zero.
fn to_float(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(0.0)
}

fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 { max * AXIS_HEADROOM } else { 1.0 }
}

fn draw_line_chart(
    path: &Path,
    caption: &str,
    (x_desc, y_desc): (&str, &str),
    points: &[(f64, f64)],
) -> Result<(), Box<dyn StdError>> {
    let x_max = axis_max(points.iter().map(|point| point.0));
    let y_max = axis_max(points.iter().map(|point| point.1));

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 26).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn plot_error(path: &Path, err: &dyn StdError) -> AppError {
    AppError::report(ReportError::Plot {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
