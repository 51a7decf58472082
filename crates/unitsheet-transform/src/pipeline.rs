//! Ordered transformation pipeline.
//!
//! Transformations execute strictly in stored order. The pipeline never
//! reorders steps to satisfy dependencies; [`TransformPipeline::forward_references`]
//! reports steps that read a column before anything creates it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use unitsheet_model::SheetData;
use unitsheet_standards::FieldRegistry;

use crate::error::{Result, TransformError};
use crate::executors::execute;
use crate::transformation::{TransformKind, Transformation};

/// Counters collected while applying a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformReport {
    /// Steps executed.
    pub applied: usize,
    /// Formula operands that read as `0` because they were not numeric.
    pub malformed_cells: usize,
    pub division_errors: usize,
    /// Columns appended to the sheet, in creation order.
    pub created_columns: Vec<String>,
    /// `(transformation id, column)` for inputs absent when the step ran.
    pub missing_columns: Vec<(String, String)>,
}

/// Applies `transformations` in list order and returns the new sheet.
pub fn apply(data: &SheetData, transformations: &[Transformation]) -> SheetData {
    apply_with_report(data, transformations).0
}

/// Like [`apply`], also returning per-run counters.
pub fn apply_with_report(
    data: &SheetData,
    transformations: &[Transformation],
) -> (SheetData, TransformReport) {
    let mut output = data.clone();
    let mut report = TransformReport::default();
    for transformation in transformations {
        let outcome = execute(&mut output, &transformation.kind);
        debug!(
            id = %transformation.id,
            kind = transformation.kind.name(),
            created = outcome.created_columns.len(),
            malformed = outcome.malformed_cells,
            "applied transformation"
        );
        report.applied += 1;
        report.malformed_cells += outcome.malformed_cells;
        report.division_errors += outcome.division_errors;
        report.created_columns.extend(outcome.created_columns);
        report.missing_columns.extend(
            outcome
                .missing_columns
                .into_iter()
                .map(|column| (transformation.id.clone(), column)),
        );
    }
    (output, report)
}

/// Applies the pipeline to the first `limit` rows only.
pub fn preview(data: &SheetData, pipeline: &TransformPipeline, limit: usize) -> SheetData {
    let head = SheetData::new(
        data.headers.clone(),
        data.rows.iter().take(limit).cloned().collect(),
    );
    pipeline.apply(&head)
}

/// Transformation counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub total: usize,
    pub split: usize,
    pub merge: usize,
    pub static_values: usize,
    pub formula: usize,
    /// Distinct columns written by any step.
    pub output_columns: usize,
}

/// A step whose target shadows a system field id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedCollision {
    pub transformation_id: String,
    pub column: String,
}

/// A step reading a column that neither the input sheet nor an earlier
/// step provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardReference {
    pub transformation_id: String,
    pub column: String,
    /// Later step that creates the column, if any.
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformPipeline {
    steps: Vec<Transformation>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pipeline from stored steps, keeping their list order.
    ///
    /// Every step is re-validated and ids must be unique.
    pub fn from_steps(steps: Vec<Transformation>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for step in &steps {
            step.validate()?;
            if !seen.insert(step.id.as_str()) {
                return Err(TransformError::DuplicateId(step.id.clone()));
            }
        }
        let mut pipeline = Self { steps };
        pipeline.renumber();
        Ok(pipeline)
    }

    pub fn steps(&self) -> &[Transformation] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transformation> {
        self.steps.iter().find(|step| step.id == id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.steps
            .iter()
            .position(|step| step.id == id)
            .ok_or_else(|| TransformError::NotFound(id.to_string()))
    }

    fn renumber(&mut self) {
        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.order = u32::try_from(idx).unwrap_or(u32::MAX);
        }
    }

    /// Appends a step.
    pub fn push(&self, transformation: Transformation) -> Result<Self> {
        transformation.validate()?;
        if self.get(&transformation.id).is_some() {
            return Err(TransformError::DuplicateId(transformation.id));
        }
        let mut next = self.clone();
        next.steps.push(transformation);
        next.renumber();
        Ok(next)
    }

    pub fn remove(&self, id: &str) -> Result<Self> {
        let idx = self.position(id)?;
        let mut next = self.clone();
        next.steps.remove(idx);
        next.renumber();
        Ok(next)
    }

    /// Moves a step one place earlier. The first step stays put.
    pub fn move_up(&self, id: &str) -> Result<Self> {
        let idx = self.position(id)?;
        let mut next = self.clone();
        if idx > 0 {
            next.steps.swap(idx, idx - 1);
            next.renumber();
        }
        Ok(next)
    }

    /// Moves a step one place later. The last step stays put.
    pub fn move_down(&self, id: &str) -> Result<Self> {
        let idx = self.position(id)?;
        let mut next = self.clone();
        if idx + 1 < next.steps.len() {
            next.steps.swap(idx, idx + 1);
            next.renumber();
        }
        Ok(next)
    }

    pub fn apply(&self, data: &SheetData) -> SheetData {
        apply(data, &self.steps)
    }

    pub fn apply_with_report(&self, data: &SheetData) -> (SheetData, TransformReport) {
        apply_with_report(data, &self.steps)
    }

    pub fn stats(&self) -> PipelineStats {
        let mut stats = PipelineStats {
            total: self.steps.len(),
            ..PipelineStats::default()
        };
        let mut outputs = BTreeSet::new();
        for step in &self.steps {
            match step.kind {
                TransformKind::Split { .. } => stats.split += 1,
                TransformKind::Merge { .. } => stats.merge += 1,
                TransformKind::Static { .. } => stats.static_values += 1,
                TransformKind::Formula { .. } => stats.formula += 1,
            }
            outputs.extend(step.kind.outputs());
        }
        stats.output_columns = outputs.len();
        stats
    }

    /// Targets named like a registry field id.
    ///
    /// Such steps are allowed and act as overrides; they are only reported.
    pub fn reserved_collisions(&self, registry: &FieldRegistry) -> Vec<ReservedCollision> {
        self.steps
            .iter()
            .flat_map(|step| {
                step.kind
                    .outputs()
                    .into_iter()
                    .filter(move |column| registry.contains(column))
                    .map(move |column| ReservedCollision {
                        transformation_id: step.id.clone(),
                        column: column.to_string(),
                    })
            })
            .collect()
    }

    /// Headers after the pipeline runs: the sheet headers, then each
    /// created column in the order steps create it.
    pub fn output_headers(&self, headers: &[String]) -> Vec<String> {
        let mut columns = headers.to_vec();
        for step in &self.steps {
            for column in step.kind.outputs() {
                if !columns.iter().any(|existing| existing == column) {
                    columns.push(column.to_string());
                }
            }
        }
        columns
    }

    /// Inputs that are neither sheet headers nor created by an earlier step.
    pub fn forward_references(&self, headers: &[String]) -> Vec<ForwardReference> {
        let mut available: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
        let mut references = Vec::new();
        for (idx, step) in self.steps.iter().enumerate() {
            for column in step.kind.inputs() {
                if available.contains(column) {
                    continue;
                }
                let created_by = self.steps[idx + 1..]
                    .iter()
                    .find(|later| later.kind.outputs().contains(&column))
                    .map(|later| later.id.clone());
                references.push(ForwardReference {
                    transformation_id: step.id.clone(),
                    column: column.to_string(),
                    created_by,
                });
            }
            available.extend(step.kind.outputs());
        }
        references
    }
}
