use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::UnitRecord;

/// One attribute of a composite grouping key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyPart {
    pub field: String,
    /// Rendered value; empty when the record has no value for the field.
    pub value: String,
}

/// Ordered tuple of `(field, value)` pairs shared by every unit of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<KeyPart>);

impl GroupKey {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|part| part.field == field)
            .map(|part| part.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            write!(f, "{}={}", part.field, part.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: usize,
    pub added: usize,
    pub removed: usize,
    pub edited: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// True when the name was set by a person rather than synthesized.
    #[serde(default)]
    pub name_is_custom: bool,
    pub key: GroupKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_plan_ref: Option<String>,
    #[serde(default)]
    pub render_image_refs: Vec<String>,
    pub units: Vec<UnitRecord>,
    pub stats: GroupStats,
}

impl Group {
    pub fn unit_ids(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.unit_id.as_str())
    }

    pub fn contains_unit(&self, unit_id: &str) -> bool {
        self.units.iter().any(|unit| unit.unit_id == unit_id)
    }

    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.name_is_custom = true;
        self
    }
}

/// The groups produced by one grouping run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSet {
    /// Run counter; the first run is generation 0.
    pub generation: u64,
    pub groups: Vec<Group>,
}

impl GroupSet {
    pub fn find_by_key(&self, key: &GroupKey) -> Option<&Group> {
        self.groups.iter().find(|group| &group.key == key)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn unit_count(&self) -> usize {
        self.groups.iter().map(|group| group.units.len()).sum()
    }
}
