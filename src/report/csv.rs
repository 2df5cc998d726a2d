use std::path::Path;

use crate::error::{AppError, AppResult, ReportError};
use crate::metrics::SummaryRow;

use super::format::format_float;

pub const SUMMARY_HEADERS: [&str; 15] = [
    "scenario",
    "phase",
    "function_type",
    "region",
    "concurrency",
    "idle_minutes",
    "requests",
    "success",
    "errors",
    "error_rate",
    "rps",
    "p50_s",
    "p95_s",
    "p99_s",
    "mean_s",
];

/// Header line plus one line per summary row, in row order.
#[must_use]
pub fn render_summary_csv(rows: &[SummaryRow]) -> String {
    let mut output = SUMMARY_HEADERS.join(",");
    output.push_str("\r\n");
    for row in rows {
        let fields = [
            row.key.scenario.as_str().to_owned(),
            row.key.phase_label().to_owned(),
            row.key.function_type.clone(),
            row.key.region.clone(),
            row.key.concurrency.to_string(),
            row.key.idle_minutes.to_string(),
            row.requests.to_string(),
            row.success.to_string(),
            row.errors.to_string(),
            format_float(row.error_rate),
            format_float(row.rps),
            format_float(row.p50_s),
            format_float(row.p95_s),
            format_float(row.p99_s),
            format_float(row.mean_s),
        ];
        push_record(&mut output, fields.iter().map(String::as_str));
    }
    output
}

/// A CSV file held as named columns and string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Cell of `row` under `column`; missing columns and short rows read as empty.
    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], column: &str) -> &'a str {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|idx| row.get(idx))
            .map_or("", String::as_str)
    }

    /// Parses CSV text with a header line. Quoted fields may contain commas,
    /// doubled quotes and line breaks.
    ///
    /// # Errors
    ///
    /// Returns an error when a quoted field is never closed.
    pub fn parse(text: &str, path: &Path) -> AppResult<Self> {
        let mut records = parse_records(text, path)?.into_iter();
        let headers = records.next().unwrap_or_default();
        Ok(Self {
            headers,
            rows: records.collect(),
        })
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        push_record(&mut output, self.headers.iter().map(String::as_str));
        for row in &self.rows {
            push_record(&mut output, row.iter().map(String::as_str));
        }
        output
    }
}

/// Reads and parses a CSV file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is malformed.
pub async fn read_csv_table(path: &Path) -> AppResult<CsvTable> {
    let text = tokio::fs::read_to_string(path).await.map_err(|err| {
        AppError::report(ReportError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    CsvTable::parse(&text, path)
}

/// Writes `table` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error when the directory or file cannot be written.
pub async fn write_csv_table(path: &Path, table: &CsvTable) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|err| {
            AppError::report(ReportError::Write {
                path: parent.to_path_buf(),
                source: err,
            })
        })?;
    }
    super::write_text(path, table.render()).await
}

fn push_record<'a, I>(output: &mut String, fields: I)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            output.push(',');
        }
        first = false;
        push_field(output, field);
    }
    output.push_str("\r\n");
}

fn push_field(output: &mut String, field: &str) {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if needs_quotes {
        output.push('"');
        output.push_str(&field.replace('"', "\"\""));
        output.push('"');
    } else {
        output.push_str(field);
    }
}

fn parse_records(text: &str, path: &Path) -> AppResult<Vec<Vec<String>>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line: usize = 1;
    let mut quote_line: usize = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                other => {
                    if other == '\n' {
                        line = line.saturating_add(1);
                    }
                    field.push(other);
                }
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line = line.saturating_add(1);
                record.push(std::mem::take(&mut field));
                if !(record.len() == 1 && record.first().is_some_and(String::is_empty)) {
                    records.push(std::mem::take(&mut record));
                }
                record.clear();
            }
            other => field.push(other),
        }
    }
    if in_quotes {
        return Err(AppError::report(ReportError::UnterminatedQuote {
            path: path.to_path_buf(),
            line: quote_line,
        }));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
