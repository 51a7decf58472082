//! Tests for record extraction.

use std::collections::BTreeSet;

use unitsheet_model::{ColumnMapping, FieldValue, SheetData, ids};
use unitsheet_standards::FieldRegistry;
use unitsheet_transform::extract_records;

fn sheet(headers: &[&str], rows: &[&[&str]]) -> SheetData {
    SheetData::new(
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| (*c).to_string()).collect())
            .collect(),
    )
}

fn mapped(field_id: &str, column: &str) -> ColumnMapping {
    ColumnMapping::unmapped(field_id).with_column(column)
}

fn unit_ids(data: &SheetData, mappings: &[ColumnMapping]) -> Vec<String> {
    extract_records(data, mappings, &FieldRegistry::builtin())
        .records
        .into_iter()
        .map(|record| record.unit_id)
        .collect()
}

#[test]
fn repeated_codes_never_share_an_id() {
    let data = sheet(&["Code"], &[&["A"], &["A"], &["A~2"]]);
    let ids = unit_ids(&data, &[mapped(ids::UNIT_CODE, "Code")]);

    assert_eq!(ids, vec!["A", "A~2", "A~2~2"]);
    let unique: BTreeSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn suffix_skips_literal_codes_seen_earlier() {
    let data = sheet(&["Code"], &[&["A"], &["A~2"], &["A"]]);
    let set = extract_records(
        &data,
        &[mapped(ids::UNIT_CODE, "Code")],
        &FieldRegistry::builtin(),
    );
    let ids: Vec<&str> = set.records.iter().map(|r| r.unit_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "A~2", "A~3"]);
    assert_eq!(set.report.duplicate_ids, 1);
}

#[test]
fn blank_codes_fall_back_to_row_number() {
    let data = sheet(&["Code"], &[&["A-1"], &[""], &["row-2"]]);
    let set = extract_records(
        &data,
        &[mapped(ids::UNIT_CODE, "Code")],
        &FieldRegistry::builtin(),
    );
    let ids: Vec<&str> = set.records.iter().map(|r| r.unit_id.as_str()).collect();
    assert_eq!(ids, vec!["A-1", "row-2", "row-2~2"]);
    assert_eq!(set.report.fallback_ids, 1);
    assert_eq!(set.report.duplicate_ids, 1);
}

#[test]
fn unmapped_code_uses_row_ids() {
    let data = sheet(&["Type"], &[&["Studio"], &["Villa"]]);
    let ids = unit_ids(&data, &[mapped(ids::UNIT_TYPE, "Type")]);
    assert_eq!(ids, vec!["row-1", "row-2"]);
}

#[test]
fn counts_invalid_numbers() {
    let data = sheet(&["BUA"], &[&["1,200"], &["TBD"], &[""]]);
    let set = extract_records(&data, &[mapped(ids::AREA, "BUA")], &FieldRegistry::builtin());

    assert_eq!(set.records[0].area(), Some(1200.0));
    assert_eq!(set.records[1].get(ids::AREA), Some(&FieldValue::Missing));
    assert_eq!(set.records[2].get(ids::AREA), Some(&FieldValue::Missing));
    assert_eq!(set.report.invalid_numbers, 1);
}

#[test]
fn enum_values_are_canonicalized_or_kept() {
    let data = sheet(&["Kind"], &[&["apartment"], &["Cabin"]]);
    let set = extract_records(
        &data,
        &[mapped(ids::CATEGORY, "Kind")],
        &FieldRegistry::builtin(),
    );

    assert_eq!(set.records[0].category().as_deref(), Some("Apartment"));
    assert_eq!(set.records[1].category().as_deref(), Some("Cabin"));
    assert_eq!(set.report.enum_mismatches, 1);
}

#[test]
fn mapped_column_resolves_ignoring_case_and_spacing() {
    let data = sheet(&["Unit  Type"], &[&["Studio"]]);
    let set = extract_records(
        &data,
        &[mapped(ids::UNIT_TYPE, "unit type")],
        &FieldRegistry::builtin(),
    );

    assert_eq!(set.records[0].unit_type().as_deref(), Some("Studio"));
    assert!(set.report.missing_columns.is_empty());
}

#[test]
fn missing_column_is_reported() {
    let data = sheet(&["Code"], &[&["A"]]);
    let set = extract_records(
        &data,
        &[mapped(ids::UNIT_CODE, "Code"), mapped(ids::AREA, "Net BUA")],
        &FieldRegistry::builtin(),
    );
    assert_eq!(set.report.missing_columns, vec!["Net BUA"]);
    assert_eq!(set.records[0].get(ids::AREA), None);
}
