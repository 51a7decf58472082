//! Grouping configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use unitsheet_model::ids;

use crate::bucket::DEFAULT_BUCKET_SIZE;

/// Key order used when neither the caller nor a project override sets one.
pub const DEFAULT_KEY_FIELDS: &[&str] = &[
    ids::DEVELOPER,
    ids::PROJECT,
    ids::PHASE,
    ids::CATEGORY,
    ids::UNIT_TYPE,
    ids::BEDROOMS,
    ids::FLOOR_PLAN,
    ids::OUTDOOR,
];

pub fn default_key_fields() -> Vec<String> {
    DEFAULT_KEY_FIELDS.iter().map(|f| (*f).to_string()).collect()
}

fn default_bucket_size() -> f64 {
    DEFAULT_BUCKET_SIZE
}

fn default_true() -> bool {
    true
}

/// Options shared by [`crate::group`] and [`crate::GroupingEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupOptions {
    /// Reuse id, name and asset refs of a prior group with the same key.
    pub merge_with_existing: bool,
    /// Keep a person-assigned name of a prior group with the same key.
    pub preserve_names: bool,
    /// Area bucket size per property type (`category` value).
    pub area_bucket_sizes: BTreeMap<String, f64>,
    #[serde(default = "default_bucket_size")]
    pub default_bucket_size: f64,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            merge_with_existing: false,
            preserve_names: false,
            area_bucket_sizes: BTreeMap::new(),
            default_bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl GroupOptions {
    /// Bucket size for a property type, compared case-insensitively.
    pub fn bucket_size_for(&self, category: Option<&str>) -> f64 {
        category
            .and_then(|category| {
                self.area_bucket_sizes
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(category))
                    .map(|(_, size)| *size)
            })
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(self.default_bucket_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Ordered key fields.
    pub key_fields: Vec<String>,
    /// Ordered key fields per project name, replacing `key_fields`.
    pub project_overrides: BTreeMap<String, Vec<String>>,
    /// Create groups for units whose key is new since the previous run.
    /// When false those units are left for [`crate::GroupingEngine::assign_to_group`].
    #[serde(default = "default_true")]
    pub auto_create_groups: bool,
    #[serde(flatten)]
    pub options: GroupOptions,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            key_fields: default_key_fields(),
            project_overrides: BTreeMap::new(),
            auto_create_groups: true,
            options: GroupOptions::default(),
        }
    }
}

impl GroupingConfig {
    pub fn with_key_fields(key_fields: &[&str]) -> Self {
        Self {
            key_fields: key_fields.iter().map(|f| (*f).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Key fields for a record of `project`.
    ///
    /// A project override wins when present and non-empty; an empty
    /// `key_fields` falls back to [`DEFAULT_KEY_FIELDS`].
    pub fn fields_for(&self, project: Option<&str>) -> Vec<&str> {
        if let Some(project) = project
            && let Some(fields) = self
                .project_overrides
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(project.trim()))
                .map(|(_, fields)| fields)
            && !fields.is_empty()
        {
            return fields.iter().map(String::as_str).collect();
        }
        if self.key_fields.is_empty() {
            DEFAULT_KEY_FIELDS.to_vec()
        } else {
            self.key_fields.iter().map(String::as_str).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_override_replaces_key() {
        let mut config = GroupingConfig::with_key_fields(&[ids::UNIT_TYPE]);
        config.project_overrides.insert(
            "Palm Hills".to_string(),
            vec![ids::UNIT_TYPE.to_string(), ids::AREA.to_string()],
        );
        assert_eq!(config.fields_for(Some("palm hills")), vec!["unit_type", "area"]);
        assert_eq!(config.fields_for(Some("Other")), vec!["unit_type"]);
        assert_eq!(config.fields_for(None), vec!["unit_type"]);
    }

    #[test]
    fn bucket_size_per_category() {
        let mut options = GroupOptions::default();
        options.area_bucket_sizes.insert("Villa".to_string(), 50.0);
        options.area_bucket_sizes.insert("Chalet".to_string(), 0.0);
        assert_eq!(options.bucket_size_for(Some("villa")), 50.0);
        assert_eq!(options.bucket_size_for(Some("Chalet")), 25.0);
        assert_eq!(options.bucket_size_for(None), 25.0);
    }
}
