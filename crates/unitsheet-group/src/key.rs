//! Composite grouping keys and group naming.

use unitsheet_model::{GroupKey, KeyPart, UnitRecord, format_number, ids};

use crate::bucket::AreaBucket;
use crate::config::GroupOptions;

/// Rendered value of one key field for a record.
///
/// `area` becomes its bucket, `outdoor` is derived from garden and roof
/// areas, and a missing value renders as an empty string.
pub fn key_value(record: &UnitRecord, field: &str, options: &GroupOptions) -> String {
    match field {
        ids::AREA => record
            .area()
            .map(|area| {
                let size = options.bucket_size_for(record.category().as_deref());
                AreaBucket::for_area(area, size).key_value()
            })
            .unwrap_or_default(),
        ids::OUTDOOR => record.outdoor_flag().to_string(),
        _ => record.text(field).unwrap_or_default(),
    }
}

pub fn composite_key(record: &UnitRecord, fields: &[&str], options: &GroupOptions) -> GroupKey {
    GroupKey::new(
        fields
            .iter()
            .map(|field| KeyPart {
                field: (*field).to_string(),
                value: key_value(record, field, options),
            })
            .collect(),
    )
}

/// Synthesized group name: `"{project} {unit type} {qualifiers}"`.
///
/// Project and unit type come from the key, or from `sample` when the key
/// does not carry them. Qualifiers follow key order; developer is left out
/// because the project already identifies it.
pub fn synthesize_name(key: &GroupKey, sample: Option<&UnitRecord>) -> String {
    let from_key_or_sample = |field: &str| {
        key.value_of(field)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| sample.and_then(|record| record.text(field)))
            .unwrap_or_default()
    };
    let mut words = vec![
        from_key_or_sample(ids::PROJECT),
        from_key_or_sample(ids::UNIT_TYPE),
    ];
    for part in key.parts() {
        if matches!(
            part.field.as_str(),
            ids::PROJECT | ids::UNIT_TYPE | ids::DEVELOPER
        ) {
            continue;
        }
        if let Some(qualifier) = qualifier(&part.field, &part.value) {
            words.push(qualifier);
        }
    }
    let name = words
        .iter()
        .flat_map(|word| word.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Ungrouped".to_string()
    } else {
        name
    }
}

fn qualifier(field: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let text = match field {
        ids::BEDROOMS => match value.parse::<f64>() {
            Ok(count) => format!("{} BR", format_number(count)),
            Err(_) => value.to_string(),
        },
        ids::AREA => AreaBucket::parse_key_value(value)
            .as_ref()
            .map_or_else(|| value.to_string(), ToString::to_string),
        ids::OUTDOOR if value == "none" => return None,
        ids::FLOOR => format!("Floor {value}"),
        _ => value.to_string(),
    };
    Some(text)
}
