//! Record extraction: mapped sheet rows to typed [`UnitRecord`]s.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use unitsheet_model::{
    ColumnLookup, ColumnMapping, FieldType, FieldValue, SheetData, UnitRecord, ids,
};
use unitsheet_standards::FieldRegistry;

use crate::numeric::parse_field_number;

/// Counters collected while extracting records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractReport {
    pub rows: usize,
    /// Rows without a unit code that received a `row-N` id.
    pub fallback_ids: usize,
    /// Rows whose unit id repeated an earlier one and got a `~N` suffix.
    pub duplicate_ids: usize,
    /// Non-empty cells of numeric fields that did not hold a number.
    pub invalid_numbers: usize,
    pub invalid_booleans: usize,
    /// Enum cells kept verbatim because they matched no allowed value.
    pub enum_mismatches: usize,
    /// Mapped columns absent from the transformed sheet.
    pub missing_columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub records: Vec<UnitRecord>,
    pub report: ExtractReport,
}

struct Binding<'a> {
    key: &'a str,
    column: usize,
    data_type: FieldType,
}

/// Builds one record per row from the mapped columns.
///
/// System fields are coerced by their registry type; custom fields stay
/// text. Empty cells become [`FieldValue::Missing`]. The unit id comes from
/// `unit_code`, falling back to `row-N` (1-based). Ids are unique within
/// the set: a repeat gets the lowest free `~N` suffix, N from 2.
pub fn extract_records(
    data: &SheetData,
    mappings: &[ColumnMapping],
    registry: &FieldRegistry,
) -> RecordSet {
    let lookup = ColumnLookup::new(&data.headers);
    let mut report = ExtractReport {
        rows: data.height(),
        ..ExtractReport::default()
    };

    let mut bindings = Vec::new();
    for mapping in mappings {
        let Some(column) = mapping.source_column_name.as_deref() else {
            continue;
        };
        let key = mapping.target_key();
        if key.is_empty() {
            continue;
        }
        let resolved = data
            .column_index(column)
            .or_else(|| lookup.get(column).and_then(|name| data.column_index(name)));
        let Some(column_idx) = resolved else {
            warn!(column, field = key, "mapped column missing from sheet");
            report.missing_columns.push(column.to_string());
            continue;
        };
        let data_type = if mapping.is_custom {
            FieldType::Text
        } else {
            registry
                .get(key)
                .map_or(FieldType::Text, |field| field.data_type.clone())
        };
        bindings.push(Binding {
            key,
            column: column_idx,
            data_type,
        });
    }

    // Every id handed out so far, including suffixed ones, so a literal
    // `A~2` code cannot collide with a generated suffix.
    let mut issued: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::with_capacity(data.height());
    for row in 0..data.height() {
        let mut values = BTreeMap::new();
        for binding in &bindings {
            let value = coerce(data.cell(row, binding.column), &binding.data_type, &mut report);
            values.insert(binding.key.to_string(), value);
        }

        let base_id = match values.get(ids::UNIT_CODE).map(FieldValue::render) {
            Some(code) if !code.trim().is_empty() => code.trim().to_string(),
            _ => {
                report.fallback_ids += 1;
                format!("row-{}", row + 1)
            }
        };
        let unit_id = if issued.contains(&base_id) {
            report.duplicate_ids += 1;
            (2u64..)
                .map(|n| format!("{base_id}~{n}"))
                .find(|candidate| !issued.contains(candidate))
                .unwrap_or_default()
        } else {
            base_id
        };
        issued.insert(unit_id.clone());

        records.push(UnitRecord {
            unit_id,
            row_index: row,
            values,
        });
    }

    debug!(
        records = records.len(),
        fallback_ids = report.fallback_ids,
        duplicate_ids = report.duplicate_ids,
        "extracted records"
    );
    RecordSet { records, report }
}

fn coerce(raw: &str, data_type: &FieldType, report: &mut ExtractReport) -> FieldValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return FieldValue::Missing;
    }
    match data_type {
        FieldType::Text => FieldValue::Text(raw.to_string()),
        FieldType::Number => match parse_field_number(raw) {
            Some(value) => FieldValue::Number(value),
            None => {
                report.invalid_numbers += 1;
                FieldValue::Missing
            }
        },
        FieldType::Boolean => match parse_bool(raw) {
            Some(value) => FieldValue::Bool(value),
            None => {
                report.invalid_booleans += 1;
                FieldValue::Missing
            }
        },
        FieldType::Enum { .. } => match data_type.canonical_enum_value(raw) {
            Some(value) => FieldValue::Text(value.to_string()),
            None => {
                report.enum_mismatches += 1;
                FieldValue::Text(raw.to_string())
            }
        },
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
