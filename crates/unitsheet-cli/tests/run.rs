use std::fs;
use std::path::Path;

use unitsheet_cli::config::parse_job;
use unitsheet_cli::pipeline::{RunOutput, load_previous, run_pipeline, write_output};
use unitsheet_ingest::read_sheet;
use unitsheet_model::{DeltaKind, SheetInput};
use unitsheet_standards::FieldRegistry;

const JOB: &str = r#"
[mapping]
auto_suggest = false

[mapping.columns]
unit_code = "Code"
project = "Compound"
unit_type = "Type"
area = "BUA"
developer = "Developer"

[[transformations]]
id = "developer"
type = "static"
target_column = "Developer"
value = "Palm Hills"

[grouping]
key_fields = ["project", "unit_type", "area"]
merge_with_existing = true

[[assets.floor_plans]]
id = "fp-apt"
unit_type = "Apartment"
area_min = 100
area_max = 120
"#;

const FIRST: &str = "\
Code,Compound,Type,BUA
A-101,Badya,Apartment,110
A-102,Badya,Apartment,118
V-1,Badya,Villa,300
";

const SECOND: &str = "\
Code,Compound,Type,BUA
A-102,Badya,Apartment,130
A-103,Badya,Apartment,112
V-1,Badya,Villa,300
";

fn sheet(dir: &Path, name: &str, text: &str) -> SheetInput {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    read_sheet(&path).unwrap()
}

fn first_run(dir: &Path) -> RunOutput {
    let job = parse_job(JOB).unwrap();
    run_pipeline(
        &sheet(dir, "first.csv", FIRST),
        &FieldRegistry::builtin(),
        &job,
        None,
    )
    .unwrap()
}

#[test]
fn groups_units_on_first_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = first_run(dir.path());

    assert_eq!(output.source_file, "first.csv");
    assert_eq!(output.summary.mapping.unmapped_mandatory, 0);
    assert_eq!(output.summary.records, 3);
    let names: Vec<&str> = output.groups.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Badya Apartment 100-125 m²", "Badya Villa 300-325 m²"]);
    assert!(output.delta.is_empty());
    assert!(output.summary.delta.is_none());
    assert!(output.summary.new_units.is_empty());
}

#[test]
fn mapping_can_target_created_column() {
    let dir = tempfile::tempdir().unwrap();
    let output = first_run(dir.path());
    let developer = output
        .mappings
        .iter()
        .find(|m| m.system_field_id == "developer")
        .unwrap();
    assert_eq!(developer.source_column_name.as_deref(), Some("Developer"));
    let unit = &output.groups.groups[0].units[0];
    assert_eq!(unit.text("developer").as_deref(), Some("Palm Hills"));
}

#[test]
fn assigns_floor_plans_from_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let output = first_run(dir.path());
    assert_eq!(output.summary.assets.with_floor_plan, 2);
    assert_eq!(output.summary.assets.without_floor_plan, 1);
    assert_eq!(
        output.groups.groups[0].floor_plan_ref.as_deref(),
        Some("fp-apt")
    );
    assert_eq!(output.groups.groups[1].floor_plan_ref, None);
}

#[test]
fn second_run_reports_delta() {
    let dir = tempfile::tempdir().unwrap();
    let previous = first_run(dir.path()).groups;
    let job = parse_job(JOB).unwrap();
    let output = run_pipeline(
        &sheet(dir.path(), "second.csv", SECOND),
        &FieldRegistry::builtin(),
        &job,
        Some(&previous),
    )
    .unwrap();

    let changes: Vec<(&str, DeltaKind)> = output
        .delta
        .iter()
        .map(|entry| (entry.unit_id.as_str(), entry.kind))
        .collect();
    assert_eq!(
        changes,
        vec![
            ("A-101", DeltaKind::Removed),
            ("A-102", DeltaKind::Edited),
            ("A-103", DeltaKind::Added),
        ]
    );
    let summary = output.summary.delta.unwrap();
    assert_eq!((summary.added, summary.removed, summary.edited), (1, 1, 1));

    // Merged groups keep their identity across uploads.
    let villa_before = &previous.groups[1];
    let villa_after = output
        .groups
        .find_by_key(&villa_before.key)
        .unwrap();
    assert_eq!(villa_after.id, villa_before.id);
    assert_eq!(output.summary.new_units, vec!["A-102"]);
}

#[test]
fn snapshot_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let output = first_run(dir.path());
    let path = dir.path().join("out").join("first.groups.json");
    write_output(&path, &output).unwrap();

    let restored = load_previous(&path).unwrap();
    assert_eq!(restored, output.groups);

    let bare = dir.path().join("bare.json");
    fs::write(&bare, serde_json::to_string(&output.groups).unwrap()).unwrap();
    assert_eq!(load_previous(&bare).unwrap(), output.groups);
}

#[test]
fn load_previous_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{\"groups\": 3}").unwrap();
    assert!(load_previous(&path).is_err());
}

#[test]
fn unmapped_fields_surface_as_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let job = parse_job(
        r#"
[mapping]
auto_suggest = false

[mapping.columns]
unit_code = "Code"
"#,
    )
    .unwrap();
    let output = run_pipeline(
        &sheet(dir.path(), "partial.csv", FIRST),
        &FieldRegistry::builtin(),
        &job,
        None,
    )
    .unwrap();

    let messages: Vec<String> = output.summary.gaps.iter().map(|gap| gap.message()).collect();
    insta::assert_debug_snapshot!(messages, @r#"
    [
        "required field project is unmapped",
        "required field unit_type is unmapped",
        "required field area is unmapped",
        "important field developer is unmapped",
        "important field phase is unmapped",
        "important field category is unmapped",
        "important field bedrooms is unmapped",
        "important field floor is unmapped",
        "important field price is unmapped",
    ]
    "#);
    assert_eq!(output.summary.mapping.unmapped_mandatory, 3);
    // Units without grouping fields still land in a single group.
    assert_eq!(output.groups.groups.len(), 1);
}
