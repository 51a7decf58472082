use std::io::Write;

use unitsheet_cli::config::{load_job, parse_job};
use unitsheet_transform::TransformKind;

const JOB: &str = r#"
[mapping]
auto_suggest = false
min_confidence = 0.8

[mapping.columns]
unit_code = "Unit No."
unit_type = "Type"

[[mapping.custom_fields]]
name = "Payment Plan"
column = "Plan"

[[transformations]]
id = "split-code"
type = "split"
source_column = "Unit No."
delimiter = "-"
target_columns = ["Building", "Unit"]

[[transformations]]
id = "price-per-m2"
type = "formula"
target_column = "Price per m2"
formula = "divide"
column1 = "Price"
column2 = "Area"

[grouping]
key_fields = ["project", "unit_type", "area"]
merge_with_existing = true

[grouping.area_bucket_sizes]
villa = 50

[[assets.floor_plans]]
id = "fp-1br"
unit_type = "1BR"
area_min = 65
area_max = 75
"#;

#[test]
fn parses_full_job() {
    let job = parse_job(JOB).unwrap();
    assert!(!job.mapping.auto_suggest);
    assert_eq!(job.mapping.columns["unit_code"], "Unit No.");
    assert_eq!(job.mapping.custom_fields[0].column.as_deref(), Some("Plan"));
    assert_eq!(job.transformations.len(), 2);
    assert!(matches!(
        job.transformations[1].kind,
        TransformKind::Formula { .. }
    ));
    assert_eq!(job.grouping.key_fields, vec!["project", "unit_type", "area"]);
    assert!(job.grouping.options.merge_with_existing);
    assert!((job.grouping.options.bucket_size_for(Some("Villa")) - 50.0).abs() < f64::EPSILON);
    assert_eq!(job.assets.floor_plans[0].id, "fp-1br");
}

#[test]
fn empty_job_uses_defaults() {
    let job = parse_job("").unwrap();
    assert!(job.mapping.auto_suggest);
    assert!(job.transformations.is_empty());
    assert!(job.grouping.auto_create_groups);
    assert!(job.delta.tracked_fields.is_none());
}

#[test]
fn rejects_incomplete_transformation() {
    let text = r#"
[[transformations]]
id = "split"
type = "split"
source_column = "Unit No."
delimiter = "-"
target_columns = []
"#;
    let error = parse_job(text).unwrap_err();
    assert!(format!("{error:#}").contains("target columns"));
}

#[test]
fn rejects_duplicate_transformation_ids() {
    let text = r#"
[[transformations]]
id = "fill"
type = "static"
target_column = "Developer"
value = "Palm Hills"

[[transformations]]
id = "fill"
type = "static"
target_column = "Phase"
value = "1"
"#;
    assert!(parse_job(text).is_err());
}

#[test]
fn loads_job_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(JOB.as_bytes()).unwrap();
    let job = load_job(file.path()).unwrap();
    assert_eq!(job.transformations[0].id, "split-code");
}

#[test]
fn missing_job_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let error = load_job(&path).unwrap_err();
    assert!(error.to_string().contains("missing.toml"));
}
