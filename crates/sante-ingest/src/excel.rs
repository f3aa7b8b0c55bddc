//! Spreadsheet reading via calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::error::{IngestError, Result};
use crate::table::{RawTable, frame_from_text};

/// Minimum number of non-empty cells for a row to count as the header.
const MIN_HEADER_CELLS: usize = 2;

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn non_empty_cells(row: &[String]) -> usize {
    row.iter().filter(|cell| !cell.trim().is_empty()).count()
}

/// Builds a raw table from sheet rows, `None` when the sheet holds no header.
///
/// Title rows above the data (a single merged cell with a caption) are
/// skipped: the header is the first row with at least two non-empty cells.
fn sheet_table(label: String, rows: &[Vec<String>]) -> Result<Option<RawTable>> {
    let Some(header_idx) = rows
        .iter()
        .position(|row| non_empty_cells(row) >= MIN_HEADER_CELLS)
    else {
        return Ok(None);
    };
    let data = frame_from_text(&rows[header_idx], &rows[header_idx + 1..])?;
    if data.width() < MIN_HEADER_CELLS {
        return Ok(None);
    }
    Ok(Some(RawTable::new(label, data)))
}

/// Reads every usable sheet of a workbook held in memory.
///
/// Sheets that fail to load or carry fewer than two columns are skipped.
pub fn read_workbook_tables(label: &str, bytes: &[u8]) -> Result<Vec<RawTable>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
            IngestError::Workbook {
                label: label.to_string(),
                message: e.to_string(),
            }
        })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut tables = Vec::with_capacity(sheet_names.len());
    for sheet in sheet_names {
        let range = match workbook.worksheet_range(&sheet) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(label, sheet = %sheet, error = %e, "skipping unreadable sheet");
                continue;
            }
        };
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        match sheet_table(format!("{label}#{sheet}"), &rows)? {
            Some(table) => tables.push(table),
            None => tracing::debug!(label, sheet = %sheet, "sheet has no tabular header"),
        }
    }
    Ok(tables)
}
