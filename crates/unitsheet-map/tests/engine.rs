use std::collections::BTreeMap;

use unitsheet_map::{MappingEngine, MappingState};
use unitsheet_model::{ColumnHint, ids};
use unitsheet_standards::FieldRegistry;

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| (*c).to_string()).collect()
}

#[test]
fn suggests_one_to_one_mappings() {
    let registry = FieldRegistry::builtin();
    let engine = MappingEngine::new(registry.fields().to_vec(), 0.8, BTreeMap::new());
    let sheet = columns(&["Unit Code", "Project Name", "Unit Type", "Net BUA (m2)", "Xyzzy"]);

    let result = engine.suggest(&sheet);

    let field_for = |column: &str| {
        result
            .mappings
            .iter()
            .find(|m| m.source_column == column)
            .map(|m| m.field_id.as_str())
    };
    assert_eq!(field_for("Unit Code"), Some(ids::UNIT_CODE));
    assert_eq!(field_for("Project Name"), Some(ids::PROJECT));
    assert_eq!(field_for("Unit Type"), Some(ids::UNIT_TYPE));
    assert_eq!(field_for("Net BUA (m2)"), Some(ids::AREA));
    assert!(result.unmapped_columns.contains(&"Xyzzy".to_string()));

    let mut fields: Vec<&str> = result.mappings.iter().map(|m| m.field_id.as_str()).collect();
    fields.sort_unstable();
    fields.dedup();
    assert_eq!(fields.len(), result.mappings.len());
}

#[test]
fn text_hint_penalizes_numeric_field() {
    let registry = FieldRegistry::builtin();
    let mut hints = BTreeMap::new();
    hints.insert(
        "Floor".to_string(),
        ColumnHint {
            is_numeric: false,
            unique_ratio: 0.2,
            null_ratio: 0.0,
        },
    );
    let engine = MappingEngine::new(registry.fields().to_vec(), 0.0, hints);
    let result = engine.suggest(&columns(&["Floor"]));
    // Exact name match is never penalized.
    let suggestion = result.suggestion_for(ids::FLOOR).expect("floor suggestion");
    assert!((suggestion.confidence - 1.0).abs() < f32::EPSILON);
}

#[test]
fn applying_suggestions_keeps_manual_choices() {
    let registry = FieldRegistry::builtin();
    let sheet = columns(&["Unit Code", "Code", "Unit Type"]);
    let manual = MappingState::new(registry.fields(), sheet.clone())
        .set_mapping(ids::UNIT_CODE, Some("Code"));

    let engine = MappingEngine::new(registry.fields().to_vec(), 0.8, BTreeMap::new());
    let result = engine.suggest(&sheet);
    let applied = manual.apply_suggestions(&result);

    assert_eq!(applied.column_for(ids::UNIT_CODE), Some("Code"));
    assert_eq!(applied.column_for(ids::UNIT_TYPE), Some("Unit Type"));
    assert!(applied.duplicate_claims().is_empty());
}
