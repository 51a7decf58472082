use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use unitsheet_model::SheetInput;

use crate::error::{IngestError, Result};

/// Rows inspected when looking for the header row.
const HEADER_PROBE_ROWS: usize = 5;

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    numeric: usize,
}

impl RowStats {
    fn ratio(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            part as f64 / total as f64
        }
    }

    fn non_empty_ratio(self) -> f64 {
        Self::ratio(self.non_empty, self.total)
    }

    fn numeric_ratio(self) -> f64 {
        Self::ratio(self.numeric, self.non_empty)
    }
}

fn row_stats(row: &[String]) -> RowStats {
    let mut stats = RowStats {
        total: row.len(),
        ..RowStats::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if trimmed.replace(',', "").parse::<f64>().is_ok() {
            stats.numeric += 1;
        }
    }
    stats
}

fn is_header_like(stats: RowStats) -> bool {
    stats.non_empty >= 2 && stats.non_empty_ratio() >= 0.5 && stats.numeric_ratio() <= 0.1
}

/// Picks the header row among the first few rows.
///
/// Developer sheets often open with a title line (`"Palm Hills inventory"`)
/// spanning one cell. The header is the first header-like row; when none
/// qualifies the first row is used.
fn detect_header_row(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .take(HEADER_PROBE_ROWS)
        .position(|row| is_header_like(row_stats(row)))
        .unwrap_or(0)
}

/// Blank headers become `Column N`; repeated headers get a ` (2)`, ` (3)` suffix.
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, header) in raw.iter().enumerate() {
        let base = match normalize_header(header) {
            name if name.is_empty() => format!("Column {}", idx + 1),
            name => name,
        };
        let mut candidate = base.clone();
        let mut counter = 2;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base} ({counter})");
            counter += 1;
        }
        headers.push(candidate);
    }
    headers
}

/// Reads a CSV sheet.
///
/// Blank rows are skipped. Rows shorter than the header are padded with
/// empty cells, longer rows are truncated.
pub fn read_sheet(path: &Path) -> Result<SheetInput> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Err(IngestError::EmptySheet {
            path: path.to_path_buf(),
        });
    }

    let header_idx = detect_header_row(&raw_rows);
    let columns = unique_headers(&raw_rows[header_idx]);
    let rows: Vec<BTreeMap<String, String>> = raw_rows
        .into_iter()
        .skip(header_idx + 1)
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| (column.clone(), row.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect();

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sheet_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(
        file = %file_name,
        header_row = header_idx,
        columns = columns.len(),
        rows = rows.len(),
        "read sheet"
    );
    Ok(SheetInput {
        total_rows: rows.len(),
        columns,
        rows,
        file_name,
        sheet_name,
    })
}

fn csv_error(path: &Path, error: csv::Error) -> IngestError {
    if error.is_io_error() {
        if let csv::ErrorKind::Io(source) = error.into_kind() {
            return IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            };
        }
        return IngestError::CsvParse {
            path: path.to_path_buf(),
            message: "i/o error".to_string(),
        };
    }
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
