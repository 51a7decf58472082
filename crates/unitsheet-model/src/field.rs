//! Canonical unit schema fields.
//!
//! A [`SystemField`] is a target attribute of the unit schema (for example
//! `bedrooms` or `area`). Sheet columns are mapped onto these fields before
//! records are extracted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Well-known field identifiers of the built-in unit schema.
pub mod ids {
    pub const UNIT_CODE: &str = "unit_code";
    pub const DEVELOPER: &str = "developer";
    pub const PROJECT: &str = "project";
    pub const PHASE: &str = "phase";
    pub const BUILDING: &str = "building";
    pub const CATEGORY: &str = "category";
    pub const UNIT_TYPE: &str = "unit_type";
    pub const AREA: &str = "area";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const FLOOR: &str = "floor";
    pub const PRICE: &str = "price";
    pub const GARDEN_AREA: &str = "garden_area";
    pub const ROOF_AREA: &str = "roof_area";
    pub const FLOOR_PLAN: &str = "floor_plan";
    pub const FINISHING: &str = "finishing";
    pub const VIEW: &str = "view";
    pub const DELIVERY_DATE: &str = "delivery_date";
    pub const STATUS: &str = "status";
    /// Derived grouping attribute: garden/roof flag computed from
    /// `garden_area` and `roof_area`. Never mapped from a column.
    pub const OUTDOOR: &str = "outdoor";
}

/// How strongly a field is expected to be mapped.
///
/// Importance only drives the gap counts shown to the operator; an
/// incomplete mapping is never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Mandatory,
    Important,
    Optional,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Mandatory => "mandatory",
            Importance::Important => "important",
            Importance::Optional => "optional",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mandatory" | "required" | "req" => Ok(Importance::Mandatory),
            "important" | "expected" => Ok(Importance::Important),
            "optional" | "opt" | "" => Ok(Importance::Optional),
            _ => Err(ModelError::Message(format!("unknown importance: {s}"))),
        }
    }
}

/// Value type of a system field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    /// Closed set of allowed values, compared case-insensitively.
    Enum { values: Vec<String> },
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Enum { .. } => "enum",
        }
    }

    /// Returns the canonical spelling of `raw` if it is an allowed enum value.
    pub fn canonical_enum_value(&self, raw: &str) -> Option<&str> {
        let FieldType::Enum { values } = self else {
            return None;
        };
        let raw = raw.trim();
        values
            .iter()
            .find(|value| value.eq_ignore_ascii_case(raw))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemField {
    pub id: String,
    pub display_name: String,
    pub importance: Importance,
    pub data_type: FieldType,
    /// Alternate column spellings used by auto-suggestion.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SystemField {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        importance: Importance,
        data_type: FieldType,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(ModelError::InvalidFieldId(id));
        }
        Ok(Self {
            id: trimmed.to_string(),
            display_name: display_name.into(),
            importance,
            data_type,
            aliases: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.importance == Importance::Mandatory
    }

    pub fn is_important(&self) -> bool {
        self.importance == Importance::Important
    }
}
