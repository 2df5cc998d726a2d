use std::path::Path;

use tracing::info;

use crate::args::MergeInput;
use crate::error::AppResult;

use super::csv::{CsvTable, read_csv_table, write_csv_table};

/// Column naming the client node a merged row came from.
pub const CLIENT_NODE_COLUMN: &str = "client_node";

/// Concatenates per-node summaries into one table at `output`.
///
/// Every row gains a `client_node` cell; the output columns are the union
/// of all input columns in first-seen order. Returns the merged row count.
///
/// # Errors
///
/// Returns an error when an input cannot be read or the output cannot be
/// written.
pub async fn merge_summaries(inputs: &[MergeInput], output: &Path) -> AppResult<usize> {
    let mut merged = CsvTable::default();
    let mut named_rows: Vec<Vec<(String, String)>> = Vec::new();
    for input in inputs {
        let table = read_csv_table(&input.path).await?;
        for row in &table.rows {
            let mut cells: Vec<(String, String)> = table
                .headers
                .iter()
                .map(|header| (header.clone(), table.cell(row, header).to_owned()))
                .filter(|(header, _)| header != CLIENT_NODE_COLUMN)
                .collect();
            cells.push((CLIENT_NODE_COLUMN.to_owned(), input.node.clone()));
            for (header, _) in &cells {
                if !merged.headers.contains(header) {
                    merged.headers.push(header.clone());
                }
            }
            named_rows.push(cells);
        }
    }

    merged.rows = named_rows
        .into_iter()
        .map(|cells| {
            merged
                .headers
                .iter()
                .map(|header| {
                    cells
                        .iter()
                        .find(|(name, _)| name == header)
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    write_csv_table(output, &merged).await?;
    info!("Merged summary written to {}", output.display());
    Ok(merged.rows.len())
}
