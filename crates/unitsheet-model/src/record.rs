use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::ids;

/// A record cell after coercion to its field's data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Missing,
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Display text; `Missing` renders as an empty string.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(value) => format_number(*value),
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::Missing => String::new(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One unit after mapping and transformation.
///
/// Values are keyed by system field id, or by display name for custom
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub unit_id: String,
    /// Zero-based position of the source row.
    pub row_index: usize,
    pub values: BTreeMap<String, FieldValue>,
}

impl UnitRecord {
    pub fn new(unit_id: impl Into<String>, row_index: usize) -> Self {
        Self {
            unit_id: unit_id.into(),
            row_index,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Non-empty rendered text of a field.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(FieldValue::render)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    pub fn unit_type(&self) -> Option<String> {
        self.text(ids::UNIT_TYPE)
    }

    pub fn project(&self) -> Option<String> {
        self.text(ids::PROJECT)
    }

    pub fn category(&self) -> Option<String> {
        self.text(ids::CATEGORY)
    }

    pub fn area(&self) -> Option<f64> {
        self.number(ids::AREA)
    }

    pub fn bedrooms(&self) -> Option<f64> {
        self.number(ids::BEDROOMS)
    }

    /// Garden/roof flag: `garden`, `roof`, `garden+roof` or `none`.
    pub fn outdoor_flag(&self) -> &'static str {
        let garden = self.number(ids::GARDEN_AREA).is_some_and(|a| a > 0.0);
        let roof = self.number(ids::ROOF_AREA).is_some_and(|a| a > 0.0);
        match (garden, roof) {
            (true, true) => "garden+roof",
            (true, false) => "garden",
            (false, true) => "roof",
            (false, false) => "none",
        }
    }
}
