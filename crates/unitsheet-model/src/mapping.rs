use serde::{Deserialize, Serialize};

/// Association between a sheet column and a system field or custom field.
///
/// Custom entries carry an empty `system_field_id` and a `custom_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub system_field_id: String,
    pub source_column_name: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl ColumnMapping {
    pub fn unmapped(field_id: impl Into<String>) -> Self {
        Self {
            system_field_id: field_id.into(),
            source_column_name: None,
            is_custom: false,
            custom_name: None,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            system_field_id: String::new(),
            source_column_name: None,
            is_custom: true,
            custom_name: Some(name.into()),
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.source_column_name = Some(column.into());
        self
    }

    pub fn is_mapped(&self) -> bool {
        self.source_column_name.is_some()
    }

    /// Key under which the mapped value is stored on a record: the system
    /// field id, or the custom name for custom entries.
    pub fn target_key(&self) -> &str {
        if self.is_custom {
            self.custom_name.as_deref().unwrap_or_default()
        } else {
            &self.system_field_id
        }
    }
}

/// Observed characteristics of a sheet column, used to steer suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnHint {
    /// True if most non-empty values parse as numbers.
    pub is_numeric: bool,
    /// Ratio of unique values to non-empty values (0.0 to 1.0).
    pub unique_ratio: f64,
    /// Ratio of empty cells to rows (0.0 to 1.0).
    pub null_ratio: f64,
}
