//! Dispatch from a source file to the reader for its container kind.

use std::path::Path;

use crate::archive::read_zip_tables;
use crate::delimited::{decode_text, read_csv_bytes};
use crate::error::{IngestError, Result};
use crate::excel::read_workbook_tables;
use crate::html::read_html_tables;
use crate::kind::ContainerKind;
use crate::table::RawTable;

/// Extracts every raw table from a container held in memory.
///
/// Fails with [`IngestError::NoTables`] when the container holds no readable
/// table at all.
pub fn extract_tables(label: &str, bytes: &[u8], kind: ContainerKind) -> Result<Vec<RawTable>> {
    let tables = match kind {
        ContainerKind::Csv => vec![read_csv_bytes(label, bytes)?],
        ContainerKind::Excel => read_workbook_tables(label, bytes)?,
        ContainerKind::Zip => read_zip_tables(label, bytes)?,
        ContainerKind::Html => read_html_tables(label, &decode_text(bytes))?,
    };
    if tables.is_empty() {
        return Err(IngestError::NoTables {
            label: label.to_string(),
        });
    }
    tracing::debug!(label, kind = %kind, tables = tables.len(), "extracted tables");
    Ok(tables)
}

/// Reads a source file from disk and extracts its tables.
///
/// `kind` overrides the container kind inferred from the extension.
pub fn read_source_file(path: &Path, kind: Option<ContainerKind>) -> Result<Vec<RawTable>> {
    let kind = kind
        .or_else(|| ContainerKind::from_path(path))
        .ok_or_else(|| IngestError::UnsupportedFormat {
            name: path.display().to_string(),
        })?;
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let label = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string);
    extract_tables(&label, &bytes, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_source_file_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cardio.csv");
        std::fs::write(&path, "annee,region,valeur\n2020,Corse,1\n").unwrap();
        let tables = read_source_file(&path, None).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].label, "cardio.csv");
    }

    #[test]
    fn test_kind_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.dat");
        std::fs::write(&path, "<table><tr><th>a</th></tr><tr><td>1</td></tr></table>").unwrap();
        assert!(matches!(
            read_source_file(&path, None),
            Err(IngestError::UnsupportedFormat { .. })
        ));
        let tables = read_source_file(&path, Some(ContainerKind::Html)).unwrap();
        assert_eq!(tables[0].height(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = read_source_file(Path::new("/nonexistent/x.csv"), None).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_html_without_tables_is_unreadable() {
        let err = extract_tables("page.html", b"<p>maintenance</p>", ContainerKind::Html)
            .unwrap_err();
        assert!(matches!(err, IngestError::NoTables { .. }));
    }
}
