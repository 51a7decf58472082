#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use unitsheet_model::{FieldType, Importance, SystemField};

use crate::error::RegistryError;
use crate::registry::FieldRegistry;

/// Environment variable pointing at a registry file (`.toml` or `.csv`)
/// that replaces the built-in schema.
pub const FIELDS_ENV_VAR: &str = "UNITSHEET_FIELDS";

#[derive(Debug, Deserialize)]
struct RegistryFile {
    fields: Vec<SystemField>,
}

/// Loads the registry named by `UNITSHEET_FIELDS`, or the built-in one.
pub fn load_default_registry() -> Result<FieldRegistry, RegistryError> {
    match std::env::var_os(FIELDS_ENV_VAR) {
        Some(path) => load_registry(&PathBuf::from(path)),
        None => Ok(FieldRegistry::builtin()),
    }
}

/// Loads a registry file, picking the parser from the extension.
pub fn load_registry(path: &Path) -> Result<FieldRegistry, RegistryError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_registry_csv(path)
    } else {
        load_registry_toml(path)
    }
}

/// Loads `[[fields]]` tables from a TOML file.
///
/// ```toml
/// [[fields]]
/// id = "unit_code"
/// display_name = "Unit Code"
/// importance = "mandatory"
/// data_type = { type = "text" }
/// aliases = ["unit no"]
/// ```
pub fn load_registry_toml(path: &Path) -> Result<FieldRegistry, RegistryError> {
    let text = std::fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
    let file: RegistryFile = toml::from_str(&text).map_err(|source| RegistryError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    let mut fields = Vec::with_capacity(file.fields.len());
    for field in file.fields {
        // Re-run id validation on deserialized entries.
        let checked = SystemField::new(
            field.id,
            field.display_name,
            field.importance,
            field.data_type,
        )?
        .with_aliases(field.aliases);
        fields.push(checked);
    }
    debug!(path = %path.display(), fields = fields.len(), "loaded field registry");
    FieldRegistry::new(fields)
}

/// Loads a registry from CSV with the header
/// `id,display_name,importance,type,values,aliases`.
///
/// `values` (enum members) and `aliases` are `|`-separated.
pub fn load_registry_csv(path: &Path) -> Result<FieldRegistry, RegistryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))?;
    let headers = reader.headers().map_err(|e| csv_error(path, &e))?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_matches('\u{feff}').eq_ignore_ascii_case(name))
    };
    let id_idx = column("id").ok_or_else(|| missing_column(path, "id"))?;
    let name_idx = column("display_name");
    let importance_idx = column("importance");
    let type_idx = column("type");
    let values_idx = column("values");
    let aliases_idx = column("aliases");

    let mut fields = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, &e))?;
        let get = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");
        let id = get(Some(id_idx));
        if id.is_empty() {
            continue;
        }
        let display_name = match get(name_idx) {
            "" => id,
            name => name,
        };
        let importance: Importance = get(importance_idx).parse()?;
        let data_type = parse_field_type(get(type_idx), get(values_idx)).ok_or_else(|| {
            RegistryError::Csv {
                path: path.to_path_buf(),
                message: format!("unknown type {:?} for field {id}", get(type_idx)),
            }
        })?;
        let field = SystemField::new(id, display_name, importance, data_type)?
            .with_aliases(split_list(get(aliases_idx)));
        fields.push(field);
    }
    debug!(path = %path.display(), fields = fields.len(), "loaded field registry");
    FieldRegistry::new(fields)
}

fn parse_field_type(raw: &str, values: &str) -> Option<FieldType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "string" | "text" => Some(FieldType::Text),
        "number" | "numeric" | "num" => Some(FieldType::Number),
        "boolean" | "bool" => Some(FieldType::Boolean),
        "enum" => Some(FieldType::Enum {
            values: split_list(values),
        }),
        _ => None,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn csv_error(path: &Path, error: &csv::Error) -> RegistryError {
    RegistryError::Csv {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn missing_column(path: &Path, name: &str) -> RegistryError {
    RegistryError::Csv {
        path: path.to_path_buf(),
        message: format!("missing column {name}"),
    }
}
