//! ZIP archives of CSV files or workbooks.

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::delimited::read_csv_bytes;
use crate::error::{IngestError, Result};
use crate::excel::read_workbook_tables;
use crate::kind::ContainerKind;
use crate::table::RawTable;

/// Reads every CSV and spreadsheet entry of a ZIP archive held in memory.
///
/// Entries of other kinds are ignored. Entries that cannot be read are
/// skipped with a warning so one corrupt file does not hide the others.
pub fn read_zip_tables(label: &str, bytes: &[u8]) -> Result<Vec<RawTable>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| IngestError::Archive {
        label: label.to_string(),
        message: e.to_string(),
    })?;

    let mut tables = Vec::new();
    for idx in 0..archive.len() {
        let (name, buffer) = {
            let mut entry = match archive.by_index(idx) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(label, index = idx, error = %e, "skipping unreadable archive entry");
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            if !matches!(
                ContainerKind::from_path(Path::new(&name)),
                Some(ContainerKind::Csv | ContainerKind::Excel)
            ) {
                tracing::debug!(label, entry = %name, "ignoring archive entry");
                continue;
            }
            let mut buffer = Vec::new();
            if let Err(e) = entry.read_to_end(&mut buffer) {
                tracing::warn!(label, entry = %name, error = %e, "skipping unreadable archive entry");
                continue;
            }
            (name, buffer)
        };

        let entry_label = format!("{label}/{name}");
        let read = match ContainerKind::from_path(Path::new(&name)) {
            Some(ContainerKind::Excel) => read_workbook_tables(&entry_label, &buffer),
            _ => read_csv_bytes(&entry_label, &buffer).map(|table| vec![table]),
        };
        match read {
            Ok(found) => tables.extend(found),
            Err(e) => {
                tracing::warn!(label, entry = %name, error = %e, "skipping unreadable archive entry");
            }
        }
    }
    Ok(tables)
}
