//! HTML pages: every `<table>` element becomes a raw table.

use scraper::{ElementRef, Html, Selector};

use crate::error::{IngestError, Result};
use crate::table::{RawTable, frame_from_text};

fn selector(label: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| IngestError::Html {
        label: label.to_string(),
        message: e.to_string(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts every table of an HTML page.
///
/// The first row with cells is the header; tables without data rows are
/// skipped.
pub fn read_html_tables(label: &str, html: &str) -> Result<Vec<RawTable>> {
    let document = Html::parse_document(html);
    let table_sel = selector(label, "table")?;
    let row_sel = selector(label, "tr")?;
    let cell_sel = selector(label, "th, td")?;

    let mut tables = Vec::new();
    for (table_idx, table) in document.select(&table_sel).enumerate() {
        let mut rows: Vec<Vec<String>> = table
            .select(&row_sel)
            .map(|row| row.select(&cell_sel).map(cell_text).collect::<Vec<_>>())
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect();
        if rows.len() < 2 {
            tracing::debug!(label, table = table_idx + 1, "skipping table without data rows");
            continue;
        }
        let header = rows.remove(0);
        let data = frame_from_text(&header, &rows)?;
        tables.push(RawTable::new(format!("{label}#table{}", table_idx + 1), data));
    }
    Ok(tables)
}
