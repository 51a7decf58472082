use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::{info, info_span};

use unitsheet_cli::config::{JobConfig, load_job};
use unitsheet_cli::pipeline::{load_previous, run_pipeline, write_output};
use unitsheet_ingest::{build_column_hints, read_sheet};
use unitsheet_map::{ConfidenceThresholds, MappingEngine};
use unitsheet_standards::{FieldRegistry, load_default_registry, load_registry};

use crate::cli::{RunArgs, SuggestArgs};
use crate::summary::{apply_table_style, confidence_cell};
use crate::types::RunResult;

pub fn load_fields(path: Option<&Path>) -> Result<FieldRegistry> {
    match path {
        Some(path) => {
            load_registry(path).with_context(|| format!("load fields from {}", path.display()))
        }
        None => load_default_registry().context("load default fields"),
    }
}

pub fn run_fields(registry: &FieldRegistry) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Name", "Importance", "Type", "Aliases"]);
    apply_table_style(&mut table);
    for field in registry.fields() {
        table.add_row(vec![
            field.id.clone(),
            field.display_name.clone(),
            field.importance.as_str().to_string(),
            field.data_type.name().to_string(),
            field.aliases.join(", "),
        ]);
    }
    println!("{table}");
    println!("Registry fingerprint: {}", registry.fingerprint());
    Ok(())
}

pub fn run_suggest(registry: &FieldRegistry, args: &SuggestArgs) -> Result<()> {
    let sheet = read_sheet(&args.sheet)
        .with_context(|| format!("read sheet {}", args.sheet.display()))?;
    let engine = MappingEngine::new(
        registry.fields().to_vec(),
        args.min_confidence,
        build_column_hints(&sheet),
    );
    let result = engine.suggest(&sheet.columns);
    let thresholds = ConfidenceThresholds::default();

    let mut table = Table::new();
    table.set_header(vec!["Column", "Field", "Confidence", "Level"]);
    apply_table_style(&mut table);
    for suggestion in &result.mappings {
        let level = thresholds
            .categorize(suggestion.confidence)
            .map_or("-", |level| level.description());
        table.add_row(vec![
            Cell::new(&suggestion.source_column),
            Cell::new(&suggestion.field_id),
            confidence_cell(suggestion.confidence),
            Cell::new(level),
        ]);
    }
    println!("{table}");
    if !result.unmapped_columns.is_empty() {
        println!("Unmatched columns: {}", result.unmapped_columns.join(", "));
    }
    Ok(())
}

pub fn run(registry: &FieldRegistry, args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!("run", sheet = %args.sheet.display());
    let _run_guard = run_span.enter();

    let job = match &args.job {
        Some(path) => load_job(path)?,
        None => JobConfig::default(),
    };
    let sheet = info_span!("ingest").in_scope(|| {
        read_sheet(&args.sheet).with_context(|| format!("read sheet {}", args.sheet.display()))
    })?;
    info!(
        columns = sheet.columns.len(),
        rows = sheet.rows.len(),
        "sheet loaded"
    );
    let previous = args
        .previous
        .as_deref()
        .map(load_previous)
        .transpose()?;

    let output = run_pipeline(&sheet, registry, &job, previous.as_ref())?;

    let output_path = if args.dry_run {
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.sheet));
        write_output(&path, &output)?;
        info!(path = %path.display(), "snapshot written");
        Some(path)
    };
    Ok(RunResult {
        output,
        output_path,
        has_previous: previous.is_some(),
    })
}

fn default_output_path(sheet: &Path) -> PathBuf {
    let stem = sheet
        .file_stem()
        .map_or_else(|| "sheet".to_string(), |stem| stem.to_string_lossy().into_owned());
    sheet.with_file_name(format!("{stem}.groups.json"))
}
