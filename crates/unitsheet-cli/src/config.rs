//! Job file: everything a run needs besides the sheet itself.
//!
//! ```toml
//! [mapping]
//! min_confidence = 0.8
//!
//! [mapping.columns]
//! unit_code = "Unit No."
//!
//! [[mapping.custom_fields]]
//! name = "Payment Plan"
//! column = "Plan"
//!
//! [[transformations]]
//! id = "split-code"
//! type = "split"
//! source_column = "Unit No."
//! delimiter = "-"
//! target_columns = ["Building", "Unit"]
//!
//! [grouping]
//! key_fields = ["project", "unit_type", "area"]
//! merge_with_existing = true
//!
//! [[assets.floor_plans]]
//! id = "fp-1br"
//! unit_type = "1BR"
//! area_min = 65
//! area_max = 75
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use unitsheet_group::{DeltaOptions, GroupingConfig};
use unitsheet_model::AssetCatalog;
use unitsheet_transform::{TransformPipeline, Transformation};

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f32 {
    0.75
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldConfig {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Fill unmapped fields from fuzzy suggestions.
    #[serde(default = "default_true")]
    pub auto_suggest: bool,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// Field id to sheet column; applied before suggestions.
    pub columns: BTreeMap<String, String>,
    pub custom_fields: Vec<CustomFieldConfig>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            auto_suggest: true,
            min_confidence: default_min_confidence(),
            columns: BTreeMap::new(),
            custom_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub mapping: MappingConfig,
    pub transformations: Vec<Transformation>,
    pub grouping: GroupingConfig,
    pub delta: DeltaOptions,
    pub assets: AssetCatalog,
}

impl JobConfig {
    /// Builds the transformation pipeline, validating every step.
    pub fn pipeline(&self) -> Result<TransformPipeline> {
        TransformPipeline::from_steps(self.transformations.clone())
            .context("invalid transformation in job file")
    }
}

pub fn load_job(path: &Path) -> Result<JobConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read job file {}", path.display()))?;
    parse_job(&text).with_context(|| format!("parse job file {}", path.display()))
}

pub fn parse_job(text: &str) -> Result<JobConfig> {
    let job: JobConfig = toml::from_str(text)?;
    job.pipeline()?;
    Ok(job)
}
