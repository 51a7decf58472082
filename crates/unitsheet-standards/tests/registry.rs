use std::fs;

use unitsheet_model::{FieldType, Importance, SystemField, ids};
use unitsheet_standards::{FieldRegistry, RegistryError, load_registry};

#[test]
fn builtin_registry_has_mandatory_core_fields() {
    let registry = FieldRegistry::builtin();
    let mandatory: Vec<&str> = registry
        .with_importance(Importance::Mandatory)
        .map(|field| field.id.as_str())
        .collect();
    assert_eq!(
        mandatory,
        vec![ids::UNIT_CODE, ids::PROJECT, ids::UNIT_TYPE, ids::AREA]
    );
    assert_eq!(
        registry.field(ids::AREA).unwrap().data_type,
        FieldType::Number
    );
    assert!(!registry.contains(ids::OUTDOOR));
}

#[test]
fn lookup_miss_is_not_found() {
    let registry = FieldRegistry::builtin();
    let err = registry.field("parking").unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { ref id } if id == "parking"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let field = SystemField::new("unit_code", "Unit", Importance::Mandatory, FieldType::Text)
        .unwrap();
    let err = FieldRegistry::new(vec![field.clone(), field]).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateField { .. }));
}

#[test]
fn fingerprint_ignores_display_names() {
    let a = FieldRegistry::new(vec![
        SystemField::new("area", "Area", Importance::Mandatory, FieldType::Number).unwrap(),
    ])
    .unwrap();
    let b = FieldRegistry::new(vec![
        SystemField::new("area", "Net BUA", Importance::Mandatory, FieldType::Number).unwrap(),
    ])
    .unwrap();
    let c = FieldRegistry::new(vec![
        SystemField::new("area", "Area", Importance::Optional, FieldType::Number).unwrap(),
    ])
    .unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);
}

#[test]
fn loads_toml_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.toml");
    fs::write(
        &path,
        r#"
[[fields]]
id = "unit_code"
display_name = "Unit Code"
importance = "mandatory"
data_type = { type = "text" }
aliases = ["unit no"]

[[fields]]
id = "status"
display_name = "Status"
importance = "optional"
data_type = { type = "enum", values = ["Available", "Sold"] }
"#,
    )
    .unwrap();

    let registry = load_registry(&path).expect("load toml registry");
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.field("unit_code").unwrap().aliases, vec!["unit no"]);
    assert_eq!(
        registry
            .field("status")
            .unwrap()
            .data_type
            .canonical_enum_value("sold"),
        Some("Sold")
    );
}

#[test]
fn loads_csv_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.csv");
    fs::write(
        &path,
        "id,display_name,importance,type,values,aliases\n\
         unit_code,Unit Code,required,string,,unit no|code\n\
         area,Net BUA,mandatory,number,,bua\n\
         status,,optional,enum,Available|Sold,\n",
    )
    .unwrap();

    let registry = load_registry(&path).expect("load csv registry");
    let ids: Vec<&str> = registry.fields().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["unit_code", "area", "status"]);
    assert_eq!(registry.field("status").unwrap().display_name, "status");
    assert_eq!(
        registry.field("unit_code").unwrap().aliases,
        vec!["unit no", "code"]
    );
}

#[test]
fn csv_registry_with_unknown_type_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.csv");
    fs::write(&path, "id,type\nhandover,date\n").unwrap();
    let err = load_registry(&path).unwrap_err();
    assert!(matches!(err, RegistryError::Csv { .. }));
}

#[test]
fn builtin_field_listing_snapshot() {
    let registry = FieldRegistry::builtin();
    let listing = registry
        .with_importance(Importance::Important)
        .map(|field| format!("{} ({})", field.id, field.data_type.name()))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(listing, @r"
    developer (string)
    phase (string)
    category (enum)
    bedrooms (number)
    floor (number)
    price (number)
    ");
}
