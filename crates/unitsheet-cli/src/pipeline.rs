//! Pipeline stages driven by the `run` command.
//!
//! Each stage wraps one engine call in an `info_span!` and logs its counts.
//! The core engines stay free of I/O; file access lives in
//! [`load_previous`] and [`write_output`].

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use unitsheet_group::{
    AssignmentBook, AssignmentStats, DeltaSummary, GroupingEngine, diff_with,
};
use unitsheet_ingest::build_column_hints;
use unitsheet_map::{MappingEngine, MappingState, MappingSummary, ValidationGap};
use unitsheet_model::{AssetAssignment, ColumnMapping, DeltaEntry, GroupSet, SheetInput};
use unitsheet_standards::FieldRegistry;
use unitsheet_transform::{
    ExtractReport, ForwardReference, ReservedCollision, TransformReport, Transformation,
    extract_records,
};

use crate::config::{JobConfig, MappingConfig};

/// Counts surfaced after a run. Advisory only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub source_rows: usize,
    pub records: usize,
    pub mapping: MappingSummary,
    pub gaps: Vec<ValidationGap>,
    pub transform: TransformReport,
    pub reserved_collisions: Vec<ReservedCollision>,
    pub forward_references: Vec<ForwardReference>,
    pub extract: ExtractReport,
    pub groups: usize,
    pub new_units: Vec<String>,
    pub unassigned_units: Vec<String>,
    pub delta: Option<DeltaSummary>,
    pub assets: AssignmentStats,
}

/// Everything handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub generated_at: String,
    pub source_file: String,
    pub registry_fingerprint: String,
    pub mappings: Vec<ColumnMapping>,
    pub transformations: Vec<Transformation>,
    pub groups: GroupSet,
    pub delta: Vec<DeltaEntry>,
    pub assets: Vec<AssetAssignment>,
    pub summary: RunSummary,
}

/// Builds the column mapping: explicit job columns first, then custom
/// fields, then fuzzy suggestions for whatever is still unmapped.
///
/// `columns` are the headers available after transformation, so a mapping
/// may target a column that a transformation creates.
pub fn map_columns(
    sheet: &SheetInput,
    columns: Vec<String>,
    registry: &FieldRegistry,
    config: &MappingConfig,
) -> Result<MappingState> {
    let mut state = MappingState::new(registry.fields(), columns);
    for (field_id, column) in &config.columns {
        state = state
            .try_set_mapping(field_id, Some(column.as_str()))
            .with_context(|| format!("map {field_id} to column {column:?}"))?;
    }
    for custom in &config.custom_fields {
        state = state
            .try_add_custom_field(&custom.name)
            .with_context(|| format!("add custom field {:?}", custom.name))?;
        if let Some(column) = &custom.column {
            state = state
                .try_set_custom_column(custom.name.trim(), Some(column.as_str()))
                .with_context(|| format!("map custom field {:?}", custom.name))?;
        }
    }
    if config.auto_suggest {
        let engine = MappingEngine::new(
            registry.fields().to_vec(),
            config.min_confidence,
            build_column_hints(sheet),
        );
        let unclaimed: Vec<String> = state
            .unmapped_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        state = state.apply_suggestions(&engine.suggest(&unclaimed));
    }
    Ok(state)
}

/// Runs mapping, transformation, extraction, grouping, delta and asset
/// assignment over one sheet.
pub fn run_pipeline(
    sheet: &SheetInput,
    registry: &FieldRegistry,
    job: &JobConfig,
    previous: Option<&GroupSet>,
) -> Result<RunOutput> {
    let started = Instant::now();

    let pipeline = job.pipeline()?;
    let data = sheet.to_data();
    let columns = pipeline.output_headers(&data.headers);
    let mapping = info_span!("map", columns = columns.len())
        .in_scope(|| map_columns(sheet, columns, registry, &job.mapping))?;
    let mapping_summary = mapping.summary(registry.fields());
    let gaps = mapping.gaps(registry.fields());
    for gap in &gaps {
        warn!(gap = %gap.message(), "mapping gap");
    }
    info!(
        mapped = mapping_summary.mapped_count,
        unmapped_mandatory = mapping_summary.unmapped_mandatory,
        unmapped_important = mapping_summary.unmapped_important,
        "mapping complete"
    );

    let reserved_collisions = pipeline.reserved_collisions(registry);
    let forward_references = pipeline.forward_references(&data.headers);
    for reference in &forward_references {
        warn!(
            transformation = %reference.transformation_id,
            column = %reference.column,
            "transformation reads a column before it exists"
        );
    }
    let (transformed, transform_report) = info_span!("transform", steps = pipeline.len())
        .in_scope(|| pipeline.apply_with_report(&data));
    info!(
        applied = transform_report.applied,
        division_errors = transform_report.division_errors,
        "transform complete"
    );

    let record_set = info_span!("extract")
        .in_scope(|| extract_records(&transformed, mapping.mappings(), registry));
    info!(records = record_set.records.len(), "extract complete");

    let engine = GroupingEngine::new(job.grouping.clone()).with_delta_options(job.delta.clone());
    let outcome = info_span!("group").in_scope(|| engine.run(&record_set.records, previous));
    info!(
        groups = outcome.groups().len(),
        new_units = outcome.new_units.len(),
        "grouping complete"
    );

    let delta = previous
        .map(|previous| {
            info_span!("delta").in_scope(|| diff_with(previous, &outcome.set, &job.delta))
        })
        .unwrap_or_default();
    let delta_summary = previous.map(|_| DeltaSummary::from_entries(&delta));

    let book = info_span!("assets").in_scope(|| {
        AssignmentBook::new(job.assets.clone()).auto_assign(&record_set.records)
    });
    let mut groups = outcome.set.clone();
    groups.groups = book.apply_to_groups(&groups.groups);
    let asset_stats = book.stats();
    info!(
        with_floor_plan = asset_stats.with_floor_plan,
        without_floor_plan = asset_stats.without_floor_plan,
        "assets complete"
    );

    let summary = RunSummary {
        source_rows: sheet.rows.len(),
        records: record_set.records.len(),
        mapping: mapping_summary,
        gaps,
        transform: transform_report,
        reserved_collisions,
        forward_references,
        extract: record_set.report,
        groups: groups.groups.len(),
        new_units: outcome.new_units.clone(),
        unassigned_units: outcome
            .unassigned
            .iter()
            .map(|unit| unit.unit_id.clone())
            .collect(),
        delta: delta_summary,
        assets: asset_stats,
    };
    info!(duration_ms = started.elapsed().as_millis(), "run complete");

    Ok(RunOutput {
        generated_at: Utc::now().to_rfc3339(),
        source_file: sheet.file_name.clone(),
        registry_fingerprint: registry.fingerprint(),
        mappings: mapping.into_mappings(),
        transformations: pipeline.steps().to_vec(),
        groups,
        delta,
        assets: book.to_assignments(),
        summary,
    })
}

/// A stored snapshot: either a bare group set or a full run output.
#[derive(Deserialize)]
#[serde(untagged)]
enum PreviousSnapshot {
    Set(GroupSet),
    Run { groups: GroupSet },
}

pub fn load_previous(path: &Path) -> Result<GroupSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read previous snapshot {}", path.display()))?;
    let snapshot: PreviousSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("parse previous snapshot {}", path.display()))?;
    Ok(match snapshot {
        PreviousSnapshot::Set(groups) | PreviousSnapshot::Run { groups } => groups,
    })
}

pub fn write_output(path: &Path, output: &RunOutput) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(output).context("serialize run output")?;
    fs::write(path, json).with_context(|| format!("write output {}", path.display()))
}
