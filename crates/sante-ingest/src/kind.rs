//! Container kinds recognised by file extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a source file wraps its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Csv,
    Excel,
    Zip,
    Html,
}

impl ContainerKind {
    /// Infers the kind from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            "zip" => Some(Self::Zip),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Infers the kind from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Zip => "zip",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            ContainerKind::from_path(Path::new("a/INCA_MCO.XLSX")),
            Some(ContainerKind::Excel)
        );
        assert_eq!(
            ContainerKind::from_path(Path::new("top_diabete.zip")),
            Some(ContainerKind::Zip)
        );
        assert_eq!(
            ContainerKind::from_path(Path::new("page.htm")),
            Some(ContainerKind::Html)
        );
        assert_eq!(ContainerKind::from_path(Path::new("notes.pdf")), None);
        assert_eq!(ContainerKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let kind: ContainerKind = serde_json::from_str("\"excel\"").unwrap();
        assert_eq!(kind, ContainerKind::Excel);
        assert_eq!(ContainerKind::Html.to_string(), "html");
    }
}
