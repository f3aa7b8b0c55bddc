//! Source file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::kind::ContainerKind;

/// Lists the files of `dir` whose extension maps to a supported container.
///
/// Returns files sorted by filename. Subdirectories are not visited.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && ContainerKind::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_source_files() {
        let dir = TempDir::new().unwrap();
        for name in ["sida.html", "cancer.xlsx", "notes.pdf", "diabete.csv"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("archive.zip")).unwrap();

        let files = list_source_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["cancer.xlsx", "diabete.csv", "sida.html"]);
    }

    #[test]
    fn test_missing_directory() {
        let result = list_source_files(Path::new("/nonexistent/donnees"));
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
