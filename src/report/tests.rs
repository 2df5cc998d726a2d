use std::future::Future;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;
use crate::args::MergeInput;
use crate::domain::{Phase, ScenarioKind};
use crate::metrics::{ColdWarmDelta, GroupKey, SummaryRow};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn row(scenario: ScenarioKind, phase: Option<Phase>, concurrency: u32) -> SummaryRow {
    SummaryRow {
        key: GroupKey {
            scenario,
            phase,
            function_type: "nohup".to_owned(),
            region: "eu".to_owned(),
            concurrency,
            idle_minutes: 0,
        },
        requests: 10,
        success: 9,
        errors: 1,
        error_rate: 0.1,
        rps: 2.0,
        p50_s: 0.12,
        p95_s: 0.3,
        p99_s: 0.35,
        mean_s: 0.15,
    }
}

#[test]
fn summary_csv_has_header_and_one_line_per_row() -> Result<(), String> {
    let text = render_summary_csv(&[
        row(ScenarioKind::Baseline, None, 1),
        row(ScenarioKind::ColdWarm, Some(Phase::Warm), 1),
    ]);
    let lines: Vec<&str> = text.split("\r\n").filter(|line| !line.is_empty()).collect();
    if lines.first() != Some(&SUMMARY_HEADERS.join(",").as_str()) {
        return Err(format!("unexpected header: {:?}", lines.first()));
    }
    if lines.get(1) != Some(&"baseline,,nohup,eu,1,0,10,9,1,0.1,2.0,0.12,0.3,0.35,0.15") {
        return Err(format!("unexpected baseline line: {:?}", lines.get(1)));
    }
    if !lines.get(2).is_some_and(|line| line.starts_with("cold_warm,warm,")) {
        return Err(format!("unexpected cold_warm line: {:?}", lines.get(2)));
    }
    Ok(())
}

#[test]
fn empty_summary_csv_still_has_a_header() -> Result<(), String> {
    let text = render_summary_csv(&[]);
    if text != format!("{}\r\n", SUMMARY_HEADERS.join(",")) {
        return Err(format!("unexpected csv: {:?}", text));
    }
    Ok(())
}

#[test]
fn csv_parse_handles_quotes_and_line_breaks() -> Result<(), String> {
    let text = "name,note\r\na,\"x, y\"\r\nb,\"say \"\"hi\"\"\nagain\"\r\n\r\n";
    let table = CsvTable::parse(text, Path::new("inline.csv")).map_err(|err| err.to_string())?;
    if table.headers != vec!["name".to_owned(), "note".to_owned()] || table.rows.len() != 2 {
        return Err(format!("unexpected table: {:?}", table));
    }
    let second = table.rows.get(1).ok_or("missing row")?;
    if table.cell(second, "note") != "say \"hi\"\nagain" || table.cell(second, "absent") != "" {
        return Err(format!("unexpected cells: {:?}", second));
    }
    let reparsed =
        CsvTable::parse(&table.render(), Path::new("again.csv")).map_err(|err| err.to_string())?;
    if reparsed != table {
        return Err("render/parse should be stable".to_owned());
    }
    Ok(())
}

#[test]
fn unterminated_quote_is_reported_with_its_line() -> Result<(), String> {
    match CsvTable::parse("a,b\n1,\"open\n", Path::new("broken.csv")) {
        Err(err) if err.to_string().contains("line 2") => Ok(()),
        other => Err(format!("expected an unterminated quote error, got {:?}", other)),
    }
}

#[test]
fn markdown_without_rows_says_so() -> Result<(), String> {
    let text = render_summary_markdown(&[], &[]).map_err(|err| err.to_string())?;
    if text != "# Benchmark summary\n\nNo data collected.\n" {
        return Err(format!("unexpected markdown: {:?}", text));
    }
    Ok(())
}

#[test]
fn markdown_lists_rows_and_deltas() -> Result<(), String> {
    let rows = [row(ScenarioKind::Concurrency, None, 10)];
    let deltas = [ColdWarmDelta {
        function_type: "nohup".to_owned(),
        region: "eu".to_owned(),
        idle_minutes: 15,
        delta_p95_s: 0.4 - 0.1,
    }];
    let text = render_summary_markdown(&rows, &deltas).map_err(|err| err.to_string())?;
    let expected_lines = [
        "| scenario | phase | function_type | region | concurrency | idle_minutes | requests | errors | rps | p50_s | p95_s | p99_s |",
        "| concurrency |  | nohup | eu | 10 | 0 | 10 | 1 | 2.0 | 0.12 | 0.3 | 0.35 |",
        "## Cold vs warm delta",
        "| nohup | eu | 15 | 0.300000 |",
    ];
    for line in expected_lines {
        if !text.lines().any(|candidate| candidate == line) {
            return Err(format!("missing line {:?} in:\n{}", line, text));
        }
    }
    Ok(())
}

#[test]
fn summaries_land_next_to_each_other() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let csv_path = write_summaries(dir.path(), &[row(ScenarioKind::Baseline, None, 1)])
            .await
            .map_err(|err| err.to_string())?;
        if csv_path != dir.path().join(SUMMARY_CSV) || !dir.path().join(SUMMARY_MARKDOWN).exists()
        {
            return Err("summary files missing".to_owned());
        }
        let table = read_csv_table(&csv_path).await.map_err(|err| err.to_string())?;
        if table.rows.len() != 1 {
            return Err(format!("unexpected rows: {:?}", table.rows));
        }
        Ok(())
    })
}

fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf, String> {
    let path = dir.join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    Ok(path)
}

#[test]
fn merge_adds_client_node_and_unions_columns() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let first = write(dir.path(), "a.csv", "scenario,rps\r\nbaseline,1.5\r\n")?;
        let second = write(
            dir.path(),
            "b.csv",
            "scenario,p95_s\r\nconcurrency,0.2\r\nbaseline,0.1\r\n",
        )?;
        let output = dir.path().join("nested").join("merged.csv");
        let inputs = [
            MergeInput {
                node: "node-a".to_owned(),
                path: first,
            },
            MergeInput {
                node: "node-b".to_owned(),
                path: second,
            },
        ];
        let count = merge_summaries(&inputs, &output)
            .await
            .map_err(|err| err.to_string())?;
        if count != 3 {
            return Err(format!("expected 3 rows, got {}", count));
        }
        let table = read_csv_table(&output).await.map_err(|err| err.to_string())?;
        let expected_headers = ["scenario", "rps", CLIENT_NODE_COLUMN, "p95_s"];
        if table.headers != expected_headers.map(str::to_owned) {
            return Err(format!("unexpected headers: {:?}", table.headers));
        }
        let nodes: Vec<&str> = table
            .rows
            .iter()
            .map(|row| table.cell(row, CLIENT_NODE_COLUMN))
            .collect();
        if nodes != vec!["node-a", "node-b", "node-b"] {
            return Err(format!("unexpected nodes: {:?}", nodes));
        }
        let first_row = table.rows.first().ok_or("missing row")?;
        if table.cell(first_row, "p95_s") != "" || table.cell(first_row, "rps") != "1.5" {
            return Err(format!("unexpected first row: {:?}", first_row));
        }
        Ok(())
    })
}

#[test]
fn merge_fails_on_missing_input() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let inputs = [MergeInput {
            node: "ghost".to_owned(),
            path: dir.path().join("missing.csv"),
        }];
        if merge_summaries(&inputs, &dir.path().join("out.csv")).await.is_ok() {
            return Err("missing input must fail".to_owned());
        }
        Ok(())
    })
}

#[test]
fn charts_are_named_by_dimension() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let table = CsvTable::parse(
        &render_summary_csv(&[
            row(ScenarioKind::Concurrency, None, 1),
            row(ScenarioKind::Concurrency, None, 10),
            row(ScenarioKind::Baseline, None, 1),
        ]),
        Path::new("summary.csv"),
    )
    .map_err(|err| err.to_string())?;
    let written = render_charts(&table, dir.path()).map_err(|err| err.to_string())?;
    let names: Vec<String> = written
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    let expected = [
        "concurrency_vs_p95_nohup_eu.png",
        "rps_vs_errors_nohup_eu_baseline.png",
        "rps_vs_errors_nohup_eu_concurrency.png",
    ];
    if names != expected.map(str::to_owned) {
        return Err(format!("unexpected charts: {:?}", names));
    }
    if written.iter().any(|path| !path.exists()) {
        return Err("chart files were not written".to_owned());
    }
    Ok(())
}
