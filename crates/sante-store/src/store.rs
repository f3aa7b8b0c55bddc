//! The storage seam.

use rusqlite::types::Value;
use sante_model::Observation;

use crate::error::Result;

/// Storage for canonical observations.
///
/// `replace_disease` and `upsert` each run in their own transaction: they
/// commit on success and leave storage untouched on any error.
pub trait ObservationStore {
    /// Creates the table and index when missing. Idempotent.
    fn ensure_schema(&mut self) -> Result<()>;

    /// Runs one SQL statement with positional parameters, returning the
    /// produced rows (empty for statements without a result set).
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>>;

    /// Rows stored for `disease`, ordered by year, region and indicator.
    fn rows_for_disease(&mut self, disease: &str) -> Result<Vec<Observation>>;

    /// Deletes every row of `disease` and inserts `rows`, atomically.
    ///
    /// Incoming rows sharing a key overwrite each other, the last one wins.
    /// Returns the number of rows written.
    fn replace_disease(&mut self, disease: &str, rows: &[Observation]) -> Result<usize>;

    /// Inserts `rows`, overwriting value and unit on key conflicts, atomically.
    fn upsert(&mut self, rows: &[Observation]) -> Result<usize>;
}
