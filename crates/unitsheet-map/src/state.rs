//! Mapping state for the column-to-field mapping workflow.
//!
//! [`MappingState`] is an immutable snapshot: every operation returns a new
//! state and leaves the receiver untouched, so callers can keep the previous
//! snapshot for undo or comparison.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use unitsheet_model::{ColumnLookup, ColumnMapping, Importance, SystemField};

use crate::engine::MappingResult;
use crate::error::MappingError;

/// Seeds one unmapped entry per system field, in registry order.
pub fn init_mappings(fields: &[SystemField]) -> Vec<ColumnMapping> {
    fields
        .iter()
        .map(|field| ColumnMapping::unmapped(field.id.clone()))
        .collect()
}

/// Counts surfaced to the operator. Advisory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub unmapped_mandatory: usize,
    pub unmapped_important: usize,
    /// Mappings (system and custom) bound to a column.
    pub mapped_count: usize,
    /// Columns claimed by more than one mapping.
    pub duplicate_claims: usize,
    pub custom_count: usize,
}

/// Counts unmapped mandatory/important fields over a mapping list.
pub fn summarize(mappings: &[ColumnMapping], fields: &[SystemField]) -> MappingSummary {
    let is_mapped = |field: &SystemField| {
        mappings
            .iter()
            .any(|m| !m.is_custom && m.system_field_id == field.id && m.is_mapped())
    };
    MappingSummary {
        unmapped_mandatory: fields
            .iter()
            .filter(|field| field.is_mandatory() && !is_mapped(field))
            .count(),
        unmapped_important: fields
            .iter()
            .filter(|field| field.is_important() && !is_mapped(field))
            .count(),
        mapped_count: mappings.iter().filter(|m| m.is_mapped()).count(),
        duplicate_claims: duplicate_claims(mappings).len(),
        custom_count: mappings.iter().filter(|m| m.is_custom).count(),
    }
}

/// A source column claimed by several mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateClaim {
    pub column: String,
    /// Target keys (field ids or custom names) in mapping order.
    pub claimants: Vec<String>,
}

pub fn duplicate_claims(mappings: &[ColumnMapping]) -> Vec<DuplicateClaim> {
    let mut by_column: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for mapping in mappings {
        if let Some(column) = mapping.source_column_name.as_deref() {
            by_column
                .entry(column)
                .or_default()
                .push(mapping.target_key().to_string());
        }
    }
    by_column
        .into_iter()
        .filter(|(_, claimants)| claimants.len() > 1)
        .map(|(column, claimants)| DuplicateClaim {
            column: column.to_string(),
            claimants,
        })
        .collect()
}

/// Non-fatal issue in a mapping, surfaced for a human decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationGap {
    UnmappedMandatory { field_id: String },
    UnmappedImportant { field_id: String },
    DuplicateClaim { column: String, claimants: Vec<String> },
}

impl ValidationGap {
    pub fn message(&self) -> String {
        match self {
            Self::UnmappedMandatory { field_id } => format!("required field {field_id} is unmapped"),
            Self::UnmappedImportant { field_id } => {
                format!("important field {field_id} is unmapped")
            }
            Self::DuplicateClaim { column, claimants } => format!(
                "column {column:?} is mapped to several fields: {}",
                claimants.join(", ")
            ),
        }
    }
}

/// Status of a field's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMappingStatus {
    Mapped,
    /// Mapped to a column that another mapping also claims.
    Contested,
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingState {
    mappings: Vec<ColumnMapping>,
    /// Columns of the loaded sheet. Empty when no sheet is attached, in
    /// which case column names are not checked.
    source_columns: Vec<String>,
}

impl MappingState {
    /// Seeds an unmapped state for a freshly loaded sheet.
    pub fn new(fields: &[SystemField], source_columns: Vec<String>) -> Self {
        Self {
            mappings: init_mappings(fields),
            source_columns,
        }
    }

    /// Restores a state from stored mappings.
    pub fn from_mappings(mappings: Vec<ColumnMapping>, source_columns: Vec<String>) -> Self {
        Self {
            mappings,
            source_columns,
        }
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn into_mappings(self) -> Vec<ColumnMapping> {
        self.mappings
    }

    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    pub fn mapping_for(&self, field_id: &str) -> Option<&ColumnMapping> {
        self.mappings
            .iter()
            .find(|m| !m.is_custom && m.system_field_id == field_id)
    }

    pub fn column_for(&self, field_id: &str) -> Option<&str> {
        self.mapping_for(field_id)
            .and_then(|m| m.source_column_name.as_deref())
    }

    pub fn custom_fields(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.mappings.iter().filter(|m| m.is_custom)
    }

    pub fn is_column_used(&self, column: &str) -> bool {
        self.mappings
            .iter()
            .any(|m| m.source_column_name.as_deref() == Some(column))
    }

    /// Sheet columns not bound to any mapping.
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.source_columns
            .iter()
            .map(String::as_str)
            .filter(|column| !self.is_column_used(column))
            .collect()
    }

    pub fn field_status(&self, field_id: &str) -> FieldMappingStatus {
        match self.column_for(field_id) {
            None => FieldMappingStatus::Unmapped,
            Some(column) => {
                let claims = self
                    .mappings
                    .iter()
                    .filter(|m| m.source_column_name.as_deref() == Some(column))
                    .count();
                if claims > 1 {
                    FieldMappingStatus::Contested
                } else {
                    FieldMappingStatus::Mapped
                }
            }
        }
    }

    /// Resolves a column against the sheet headers, tolerating case and
    /// spacing differences.
    fn resolve_column(&self, column: &str) -> Result<String, MappingError> {
        if self.source_columns.is_empty() {
            return Ok(column.to_string());
        }
        ColumnLookup::new(&self.source_columns)
            .get(column)
            .map(str::to_string)
            .ok_or_else(|| MappingError::ColumnNotFound(column.to_string()))
    }

    /// Binds `field_id` to `column`, or clears it with `None`.
    ///
    /// Other fields claiming the same column keep their claim; the overlap
    /// is reported through [`Self::gaps`].
    pub fn try_set_mapping(
        &self,
        field_id: &str,
        column: Option<&str>,
    ) -> Result<Self, MappingError> {
        let resolved = column.map(|c| self.resolve_column(c)).transpose()?;
        let mut next = self.clone();
        let mapping = next
            .mappings
            .iter_mut()
            .find(|m| !m.is_custom && m.system_field_id == field_id)
            .ok_or_else(|| MappingError::FieldNotFound(field_id.to_string()))?;
        mapping.source_column_name = resolved;
        Ok(next)
    }

    /// Like [`Self::try_set_mapping`], returning an unchanged copy on error.
    #[must_use]
    pub fn set_mapping(&self, field_id: &str, column: Option<&str>) -> Self {
        self.try_set_mapping(field_id, column).unwrap_or_else(|error| {
            debug!(%error, field_id, "mapping unchanged");
            self.clone()
        })
    }

    /// Adds a custom field. Names are compared case-sensitively.
    pub fn try_add_custom_field(&self, name: &str) -> Result<Self, MappingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MappingError::EmptyCustomName);
        }
        if self
            .custom_fields()
            .any(|m| m.custom_name.as_deref() == Some(name))
        {
            return Err(MappingError::DuplicateCustomField(name.to_string()));
        }
        let mut next = self.clone();
        next.mappings.push(ColumnMapping::custom(name));
        Ok(next)
    }

    /// Adds a custom field; a blank or existing name leaves the state as is.
    #[must_use]
    pub fn add_custom_field(&self, name: &str) -> Self {
        self.try_add_custom_field(name).unwrap_or_else(|error| {
            debug!(%error, "custom field not added");
            self.clone()
        })
    }

    #[must_use]
    pub fn remove_custom_field(&self, name: &str) -> Self {
        let name = name.trim();
        let mut next = self.clone();
        next.mappings
            .retain(|m| !(m.is_custom && m.custom_name.as_deref() == Some(name)));
        next
    }

    /// Binds a custom field to a column, or clears it with `None`.
    pub fn try_set_custom_column(
        &self,
        name: &str,
        column: Option<&str>,
    ) -> Result<Self, MappingError> {
        let resolved = column.map(|c| self.resolve_column(c)).transpose()?;
        let mut next = self.clone();
        let mapping = next
            .mappings
            .iter_mut()
            .find(|m| m.is_custom && m.custom_name.as_deref() == Some(name))
            .ok_or_else(|| MappingError::CustomFieldNotFound(name.to_string()))?;
        mapping.source_column_name = resolved;
        Ok(next)
    }

    /// Fills unmapped fields from engine suggestions.
    ///
    /// Fields that already have a column and columns that are already
    /// claimed are left alone, so manual choices survive.
    #[must_use]
    pub fn apply_suggestions(&self, result: &MappingResult) -> Self {
        let mut next = self.clone();
        for suggestion in &result.mappings {
            if next.is_column_used(&suggestion.source_column) {
                continue;
            }
            if let Some(mapping) = next
                .mappings
                .iter_mut()
                .find(|m| !m.is_custom && m.system_field_id == suggestion.field_id)
                && mapping.source_column_name.is_none()
            {
                mapping.source_column_name = Some(suggestion.source_column.clone());
            }
        }
        next
    }

    pub fn summary(&self, fields: &[SystemField]) -> MappingSummary {
        summarize(&self.mappings, fields)
    }

    pub fn duplicate_claims(&self) -> Vec<DuplicateClaim> {
        duplicate_claims(&self.mappings)
    }

    /// All advisory gaps: unmapped mandatory and important fields, then
    /// duplicate claims.
    pub fn gaps(&self, fields: &[SystemField]) -> Vec<ValidationGap> {
        let mut gaps = Vec::new();
        for field in fields {
            if self.column_for(&field.id).is_some() {
                continue;
            }
            match field.importance {
                Importance::Mandatory => gaps.push(ValidationGap::UnmappedMandatory {
                    field_id: field.id.clone(),
                }),
                Importance::Important => gaps.push(ValidationGap::UnmappedImportant {
                    field_id: field.id.clone(),
                }),
                Importance::Optional => {}
            }
        }
        gaps.extend(
            self.duplicate_claims()
                .into_iter()
                .map(|claim| ValidationGap::DuplicateClaim {
                    column: claim.column,
                    claimants: claim.claimants,
                }),
        );
        gaps
    }
}
