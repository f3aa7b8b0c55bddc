//! Storage of canonical observations.
//!
//! The [`ObservationStore`] trait is the seam between the pipeline and the
//! database. [`SqliteStore`] implements it on a single `observations` table
//! keyed by (disease, year, region, indicator).
//!
//! Writes go through [`sync_disease`], which replaces (or upserts) one
//! disease at a time inside a single transaction, exporting the rows about
//! to be deleted to a backup CSV first.

mod error;
mod query;
mod schema;
mod sink;
mod sqlite;
mod store;

pub use error::{Result, StoreError};
pub use query::{
    IndicatorStats, ObservationFilter, StatsFilter, indicator_stats, query_observations,
};
pub use rusqlite::types::Value;
pub use schema::{INDEX_NAME, SCHEMA_SQL, TABLE_NAME};
pub use sink::{SyncOptions, SyncReport, WriteMode, backup_file_name, sync_disease};
pub use sqlite::SqliteStore;
pub use store::ObservationStore;
