#![deny(unsafe_code)]

use std::collections::HashMap;

use unitsheet_model::{Importance, SystemField};

use crate::error::RegistryError;
use crate::hash::sha256_hex;

/// Immutable catalog of the canonical unit fields.
///
/// Loaded once per process. Lookups never fail other than by id miss; the
/// registry has no opinion on whether a mapping is complete.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<SystemField>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    /// Builds a registry, keeping the given field order.
    pub fn new(fields: Vec<SystemField>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            if index.insert(field.id.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateField {
                    id: field.id.clone(),
                });
            }
        }
        Ok(Self { fields, index })
    }

    pub(crate) fn from_parts(fields: Vec<SystemField>, index: HashMap<String, usize>) -> Self {
        Self { fields, index }
    }

    pub fn fields(&self) -> &[SystemField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Result<&SystemField, RegistryError> {
        self.get(id).ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    pub fn get(&self, id: &str) -> Option<&SystemField> {
        self.index.get(id).map(|&idx| &self.fields[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn with_importance(&self, importance: Importance) -> impl Iterator<Item = &SystemField> {
        self.fields
            .iter()
            .filter(move |field| field.importance == importance)
    }

    /// Stable digest of ids, types and importances.
    ///
    /// Recorded next to run output so a stored snapshot can be matched
    /// against the registry that produced it. Display names and aliases do
    /// not contribute.
    pub fn fingerprint(&self) -> String {
        let mut canonical = String::new();
        for field in &self.fields {
            canonical.push_str(&field.id);
            canonical.push('\t');
            canonical.push_str(field.data_type.name());
            if let unitsheet_model::FieldType::Enum { values } = &field.data_type {
                canonical.push('[');
                canonical.push_str(&values.join(","));
                canonical.push(']');
            }
            canonical.push('\t');
            canonical.push_str(field.importance.as_str());
            canonical.push('\n');
        }
        sha256_hex(canonical.as_bytes())
    }
}
