//! Error types for mapping operations.

use thiserror::Error;

/// Errors from checked mapping operations.
///
/// The unchecked counterparts treat each of these as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Field id is not part of the mapping set.
    #[error("field not found: {0}")]
    FieldNotFound(String),
    /// Column not present in the loaded sheet.
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    /// Custom field name is blank.
    #[error("custom field name is empty")]
    EmptyCustomName,
    /// Custom field with this name already exists.
    #[error("custom field already exists: {0}")]
    DuplicateCustomField(String),
    /// No custom field with this name.
    #[error("custom field not found: {0}")]
    CustomFieldNotFound(String),
}
