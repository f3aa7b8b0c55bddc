use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sante_cli::config::Config;
use sante_cli::pipeline::written_files;
use sante_cli::types::{RunResult, SourceOutcome, StorageOutcome, StorageSummary};
use sante_model::Observation;
use sante_output::{CountEntry, QualityReport};
use sante_store::IndicatorStats;

pub fn print_summary(result: &RunResult) {
    print_sources(result);
    if result.diseases.is_empty() {
        println!("No source produced rows; nothing was written.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Disease"),
        header_cell("Sources"),
        header_cell("Normalized"),
        header_cell("Removed"),
        header_cell("Cleaned"),
        header_cell("Aggregated"),
        header_cell("Stored"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 6, CellAlignment::Center);

    let mut totals = [0usize; 5];
    for summary in &result.diseases {
        let counts = [
            summary.sources,
            summary.normalized_rows,
            summary.removed_rows,
            summary.cleaned_rows,
            summary.aggregated_rows,
        ];
        for (total, count) in totals.iter_mut().zip(counts) {
            *total += count;
        }
        table.add_row(vec![
            Cell::new(&summary.disease)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.sources),
            Cell::new(summary.normalized_rows),
            count_cell(Some(summary.removed_rows), Color::Yellow),
            Cell::new(summary.cleaned_rows),
            Cell::new(summary.aggregated_rows),
            storage_cell(result.stored_for(&summary.disease)),
        ]);
    }
    let mut total_row = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ];
    total_row.extend(
        totals
            .iter()
            .map(|total| Cell::new(total).add_attribute(Attribute::Bold)),
    );
    total_row.push(dim_cell("-"));
    table.add_row(total_row);
    println!("{table}");

    print_storage_extras(&result.storage);
    for path in written_files(result) {
        println!("Wrote {}", path.display());
    }
    if let Some(report) = &result.report {
        println!();
        print_report(report);
    }
    let errors: Vec<(&str, &str)> = result.storage_errors().collect();
    if !errors.is_empty() {
        eprintln!("Storage errors:");
        for (disease, message) in errors {
            eprintln!("- {disease}: {message}");
        }
    }
}

fn print_sources(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Disease"),
        header_cell("Tables"),
        header_cell("Rows"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for source in &result.sources {
        let (tables, rows, status) = match &source.outcome {
            SourceOutcome::Normalized { tables, rows } => (
                Cell::new(tables),
                Cell::new(rows),
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
            ),
            SourceOutcome::Skipped { reason } => (
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(format!("skipped: {reason}")).fg(Color::Yellow),
            ),
        };
        table.add_row(vec![
            Cell::new(&source.name),
            Cell::new(&source.disease),
            tables,
            rows,
            status,
        ]);
    }
    println!("{table}");
}

fn storage_cell(outcome: Option<&StorageOutcome>) -> Cell {
    match outcome {
        Some(StorageOutcome::Written(report)) => {
            Cell::new(format!("{} ({})", report.written, report.mode)).fg(Color::Green)
        }
        Some(StorageOutcome::Failed { .. }) => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

/// Prints where stored rows were backed up before a replace.
fn print_storage_extras(storage: &[StorageSummary]) {
    for summary in storage {
        if let StorageOutcome::Written(report) = &summary.outcome
            && let Some(path) = &report.backup
        {
            println!("Backup of {}: {}", summary.disease, path.display());
        }
    }
}

/// Prints the outcome of loading a canonical CSV into storage.
pub fn print_storage(storage: &[StorageSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Disease"),
        header_cell("Mode"),
        header_cell("Written"),
        header_cell("Skipped"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in storage {
        let row = match &summary.outcome {
            StorageOutcome::Written(report) => vec![
                Cell::new(&summary.disease),
                Cell::new(report.mode),
                Cell::new(report.written),
                count_cell(
                    Some(report.skipped_incomplete + report.skipped_foreign),
                    Color::Yellow,
                ),
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
            ],
            StorageOutcome::Failed { message } => vec![
                Cell::new(&summary.disease),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(message).fg(Color::Red),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");
    print_storage_extras(storage);
}

pub fn print_report(report: &QualityReport) {
    println!("Quality report");
    println!("  Rows: {}", report.total_rows);
    println!("  Columns: {}", report.columns.join(", "));
    if let Some(years) = &report.years {
        println!(
            "  Years: {} to {} ({} distinct)",
            years.min, years.max, years.distinct
        );
    }
    println!(
        "  Regions: {} (e.g. {})",
        report.region_count,
        report.region_examples.join(", ")
    );
    if let Some(values) = &report.values {
        println!(
            "  Values: min {} / max {} / mean {} / median {}",
            values.min, values.max, values.mean, values.median
        );
    }
    print_counts("Disease", &report.diseases);
    print_counts("Indicator", &report.indicators);
    if !report.missing.is_empty() {
        print_counts("Column with nulls", &report.missing);
    }
}

fn print_counts(label: &str, entries: &[CountEntry]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell(label), header_cell("Rows"), header_cell("%")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.count),
            Cell::new(format!("{:.1}", entry.percent)),
        ]);
    }
    println!("{table}");
}

pub fn print_observations(rows: &[Observation]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("maladie"),
        header_cell("annee"),
        header_cell("region"),
        header_cell("indicateur"),
        header_cell("valeur"),
        header_cell("unite"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.disease),
            Cell::new(row.year),
            Cell::new(&row.region),
            Cell::new(&row.indicator),
            Cell::new(row.value),
            if row.unit.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(&row.unit)
            },
        ]);
    }
    println!("{table}");
    println!("{} row(s)", rows.len());
}

pub fn print_stats(stats: &[IndicatorStats]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("indicateur"),
        header_cell("annee"),
        header_cell("moyenne"),
        header_cell("min"),
        header_cell("max"),
        header_cell("n"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in stats {
        table.add_row(vec![
            Cell::new(&entry.indicator),
            Cell::new(entry.year),
            Cell::new(entry.mean),
            Cell::new(entry.min),
            Cell::new(entry.max),
            Cell::new(entry.count),
        ]);
    }
    println!("{table}");
}

pub fn print_configured_sources(config: &Config) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Disease"),
        header_cell("Kind"),
        header_cell("File"),
        header_cell("Present"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for source in &config.sources {
        let path = source.path(&config.paths.data_dir);
        let kind = source
            .resolved_kind()
            .map_or_else(|| dim_cell("?"), |kind| Cell::new(kind.as_str()));
        let present = if path.is_file() {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(&source.name),
            Cell::new(&source.disease),
            kind,
            Cell::new(path.display()),
            present,
        ]);
    }
    println!("{table}");
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
