use std::collections::{BTreeMap, BTreeSet};

use unitsheet_model::{ColumnHint, SheetInput};

/// Share of non-empty values that must parse as numbers for a column to
/// count as numeric. Inventory sheets carry stray notes (`"TBD"`, `"-"`)
/// in otherwise numeric columns.
const NUMERIC_SHARE_MIN: f64 = 0.9;

pub fn build_column_hints(sheet: &SheetInput) -> BTreeMap<String, ColumnHint> {
    let mut hints = BTreeMap::new();
    let row_count = sheet.rows.len();
    for column in &sheet.columns {
        let mut non_null = 0usize;
        let mut numeric = 0usize;
        let mut uniques = BTreeSet::new();
        for row in &sheet.rows {
            let trimmed = row.get(column).map(String::as_str).unwrap_or("").trim();
            if trimmed.is_empty() {
                continue;
            }
            non_null += 1;
            uniques.insert(trimmed);
            if trimmed.replace(',', "").parse::<f64>().is_ok() {
                numeric += 1;
            }
        }
        let null_ratio = if row_count == 0 {
            1.0
        } else {
            (row_count.saturating_sub(non_null)) as f64 / row_count as f64
        };
        let unique_ratio = if non_null == 0 {
            0.0
        } else {
            uniques.len() as f64 / non_null as f64
        };
        let is_numeric = non_null > 0 && numeric as f64 / non_null as f64 >= NUMERIC_SHARE_MIN;
        hints.insert(
            column.clone(),
            ColumnHint {
                is_numeric,
                unique_ratio,
                null_ratio,
            },
        );
    }
    hints
}
