//! Source ingestion for public health datasets.
//!
//! Public data portals publish the same kind of statistic as CSV, Excel
//! workbooks, ZIP archives of either, or plain HTML pages with tables. This
//! crate turns any of those containers into a list of raw tables with text
//! cells, leaving interpretation of the columns to the normalizer.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sante_ingest::{ContainerKind, read_source_file};
//!
//! let tables = read_source_file(Path::new("donnees_sante/diabete.csv"), None)?;
//! for table in &tables {
//!     println!("{}: {} rows", table.label, table.data.height());
//! }
//! ```

mod archive;
mod delimited;
mod discovery;
mod error;
mod excel;
mod html;
mod kind;
mod source;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Container Kinds ===
pub use kind::ContainerKind;

// === Raw Tables ===
pub use table::{RawTable, frame_from_text};

// === Readers ===
pub use archive::read_zip_tables;
pub use delimited::{read_csv_bytes, sniff_delimiter};
pub use excel::read_workbook_tables;
pub use html::read_html_tables;
pub use source::{extract_tables, read_source_file};

// === File Discovery ===
pub use discovery::list_source_files;
