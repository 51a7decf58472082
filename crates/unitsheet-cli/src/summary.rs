use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use unitsheet_map::ValidationGap;
use unitsheet_model::{DeltaEntry, DeltaKind, Group};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    let output = &result.output;
    let summary = &output.summary;
    println!("Sheet: {}", output.source_file);
    match &result.output_path {
        Some(path) => println!("Snapshot: {}", path.display()),
        None => println!("Snapshot: not written (dry run)"),
    }
    println!(
        "Rows: {}  Units: {}  Groups: {}",
        summary.source_rows, summary.records, summary.groups
    );
    print_gap_table(&summary.gaps);
    print_group_table(&output.groups.groups);
    if result.has_previous {
        print_delta_table(&output.delta);
    }
    let assets = &summary.assets;
    println!(
        "Assets: {} of {} units have a floor plan ({} manual, {} auto), {} have renders",
        assets.with_floor_plan, assets.units, assets.manual, assets.auto, assets.with_renders
    );
    if !summary.unassigned_units.is_empty() {
        println!(
            "Awaiting group assignment: {}",
            summary.unassigned_units.join(", ")
        );
    }
    if summary.transform.division_errors > 0 {
        eprintln!(
            "Warning: {} formula cells divided by zero",
            summary.transform.division_errors
        );
    }
}

fn print_gap_table(gaps: &[ValidationGap]) {
    if gaps.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Severity"), header_cell("Issue")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for gap in gaps {
        table.add_row(vec![gap_severity_cell(gap), Cell::new(gap.message())]);
    }
    println!();
    println!("Mapping:");
    println!("{table}");
}

fn print_group_table(groups: &[Group]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Name"),
        header_cell("Units"),
        header_cell("Added"),
        header_cell("Edited"),
        header_cell("Removed"),
        header_cell("Floor plan"),
    ]);
    apply_group_table_style(&mut table);
    for column in 2..=5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    let mut total_units = 0usize;
    for group in groups {
        total_units += group.stats.total;
        table.add_row(vec![
            dim_cell(&group.id),
            name_cell(group),
            Cell::new(group.stats.total),
            count_cell(group.stats.added, Color::Green),
            count_cell(group.stats.edited, Color::Yellow),
            count_cell(group.stats.removed, Color::Red),
            group
                .floor_plan_ref
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} groups", groups.len())).add_attribute(Attribute::Bold),
        Cell::new(total_units).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!();
    println!("{table}");
}

fn print_delta_table(entries: &[DeltaEntry]) {
    println!();
    if entries.is_empty() {
        println!("No changes since the previous upload.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Unit"),
        header_cell("Change"),
        header_cell("From group"),
        header_cell("To group"),
        header_cell("Fields"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.unit_id),
            delta_kind_cell(entry.kind),
            optional_cell(entry.previous_group_id.as_deref()),
            optional_cell(entry.new_group_id.as_deref()),
            if entry.changed_fields.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(entry.changed_fields.join(", "))
            },
        ]);
    }
    println!("Changes:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_group_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn confidence_cell(confidence: f32) -> Cell {
    let text = format!("{confidence:.2}");
    if confidence >= 0.95 {
        Cell::new(text).fg(Color::Green)
    } else if confidence >= 0.85 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text).fg(Color::DarkYellow)
    }
}

fn gap_severity_cell(gap: &ValidationGap) -> Cell {
    match gap {
        ValidationGap::UnmappedMandatory { .. } => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        ValidationGap::UnmappedImportant { .. } | ValidationGap::DuplicateClaim { .. } => {
            Cell::new("WARN").fg(Color::Yellow)
        }
    }
}

fn delta_kind_cell(kind: DeltaKind) -> Cell {
    let color = match kind {
        DeltaKind::Added => Color::Green,
        DeltaKind::Removed => Color::Red,
        DeltaKind::Edited => Color::Yellow,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn name_cell(group: &Group) -> Cell {
    if group.name_is_custom {
        Cell::new(&group.name).add_attribute(Attribute::Italic)
    } else {
        Cell::new(&group.name)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), dim_cell)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
