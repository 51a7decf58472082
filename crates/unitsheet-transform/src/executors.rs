//! Transformation executor functions.
//!
//! Each function applies one [`TransformKind`] to a [`SheetData`] in place.
//! Columns that do not exist read as empty cells; target columns are
//! appended when absent. Row count never changes.

use unitsheet_model::{SheetData, format_number};

use crate::numeric::operand;
use crate::transformation::{DEFAULT_MERGE_SEPARATOR, FormulaOp, TransformKind};

/// Cell value written when a formula divides by zero.
pub const DIVISION_BY_ZERO: &str = "Error: Division by zero";

/// Per-step counters folded into the run report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Formula operands that were not numeric and read as `0`.
    pub malformed_cells: usize,
    pub division_errors: usize,
    /// Target columns appended by the step.
    pub created_columns: Vec<String>,
    /// Input columns absent from the sheet when the step ran.
    pub missing_columns: Vec<String>,
}

pub fn execute(data: &mut SheetData, kind: &TransformKind) -> StepOutcome {
    let mut outcome = StepOutcome {
        missing_columns: kind
            .inputs()
            .into_iter()
            .filter(|column| data.column_index(column).is_none())
            .map(str::to_string)
            .collect(),
        ..StepOutcome::default()
    };
    match kind {
        TransformKind::Split {
            source_column,
            delimiter,
            target_columns,
        } => apply_split(data, source_column, delimiter, target_columns, &mut outcome),
        TransformKind::Merge {
            source_columns,
            target_column,
            separator,
        } => {
            let separator = separator
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_MERGE_SEPARATOR);
            apply_merge(data, source_columns, separator, target_column, &mut outcome);
        }
        TransformKind::Static {
            target_column,
            value,
        } => apply_static(data, target_column, value, &mut outcome),
        TransformKind::Formula {
            target_column,
            op,
            column1,
            column2,
        } => apply_formula(data, *op, column1, column2, target_column, &mut outcome),
    }
    outcome
}

fn target_index(data: &mut SheetData, column: &str, outcome: &mut StepOutcome) -> usize {
    if data.column_index(column).is_none() {
        outcome.created_columns.push(column.to_string());
    }
    data.ensure_column(column)
}

/// Splits the source cell on a literal delimiter.
///
/// Target `i` receives segment `i`, or an empty string when the cell has
/// fewer segments. Extra segments are dropped.
pub(crate) fn apply_split(
    data: &mut SheetData,
    source: &str,
    delimiter: &str,
    targets: &[String],
    outcome: &mut StepOutcome,
) {
    let source_idx = data.column_index(source);
    let target_idxs: Vec<usize> = targets
        .iter()
        .map(|target| target_index(data, target, outcome))
        .collect();

    for row in 0..data.height() {
        let raw = source_idx
            .map(|idx| data.cell(row, idx).to_string())
            .unwrap_or_default();
        let mut segments = raw.split(delimiter);
        for &target in &target_idxs {
            let segment = segments.next().unwrap_or_default().to_string();
            data.set_cell(row, target, segment);
        }
    }
}

/// Joins the non-empty source cells in listed order.
pub(crate) fn apply_merge(
    data: &mut SheetData,
    sources: &[String],
    separator: &str,
    target: &str,
    outcome: &mut StepOutcome,
) {
    let source_idxs: Vec<Option<usize>> = sources
        .iter()
        .map(|source| data.column_index(source))
        .collect();
    let target_idx = target_index(data, target, outcome);

    for row in 0..data.height() {
        let merged = source_idxs
            .iter()
            .flatten()
            .map(|&idx| data.cell(row, idx))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(separator);
        data.set_cell(row, target_idx, merged);
    }
}

pub(crate) fn apply_static(
    data: &mut SheetData,
    target: &str,
    value: &str,
    outcome: &mut StepOutcome,
) {
    let target_idx = target_index(data, target, outcome);
    for row in 0..data.height() {
        data.set_cell(row, target_idx, value.to_string());
    }
}

/// Computes `column1 <op> column2` per row.
///
/// Non-numeric operands read as `0`. Dividing by zero writes
/// [`DIVISION_BY_ZERO`] into the cell.
pub(crate) fn apply_formula(
    data: &mut SheetData,
    op: FormulaOp,
    column1: &str,
    column2: &str,
    target: &str,
    outcome: &mut StepOutcome,
) {
    let lhs_idx = data.column_index(column1);
    let rhs_idx = data.column_index(column2);
    let target_idx = target_index(data, target, outcome);

    for row in 0..data.height() {
        let (lhs, lhs_bad) = operand(lhs_idx.map_or("", |idx| data.cell(row, idx)));
        let (rhs, rhs_bad) = operand(rhs_idx.map_or("", |idx| data.cell(row, idx)));
        outcome.malformed_cells += usize::from(lhs_bad) + usize::from(rhs_bad);

        let value = match op.eval(lhs, rhs) {
            Some(result) => format_number(result),
            None => {
                outcome.division_errors += 1;
                DIVISION_BY_ZERO.to_string()
            }
        };
        data.set_cell(row, target_idx, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> SheetData {
        SheetData::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn split_pads_and_drops_segments() {
        let mut data = sheet(&["Code"], &[&["A-B-C"], &["D"]]);
        let mut outcome = StepOutcome::default();
        let targets = vec!["X".to_string(), "Y".to_string()];
        apply_split(&mut data, "Code", "-", &targets, &mut outcome);

        assert_eq!(data.headers, vec!["Code", "X", "Y"]);
        assert_eq!(data.rows[0], vec!["A-B-C", "A", "B"]);
        assert_eq!(data.rows[1], vec!["D", "D", ""]);
        assert_eq!(outcome.created_columns, vec!["X", "Y"]);
    }

    #[test]
    fn formula_counts_malformed_operands() {
        let mut data = sheet(&["A", "B"], &[&["x", "3"], &["4", "0"]]);
        let mut outcome = StepOutcome::default();
        apply_formula(&mut data, FormulaOp::Divide, "A", "B", "C", &mut outcome);

        assert_eq!(data.column_values("C"), vec!["0", DIVISION_BY_ZERO]);
        assert_eq!(outcome.malformed_cells, 1);
        assert_eq!(outcome.division_errors, 1);
    }
}
