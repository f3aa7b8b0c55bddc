//! SQLite implementation of [`ObservationStore`].

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use sante_model::Observation;

use crate::error::{Result, StoreError};
use crate::schema::SCHEMA_SQL;
use crate::store::ObservationStore;

const UPSERT_SQL: &str = "INSERT INTO observations (maladie, annee, region, indicateur, valeur, unite)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT(maladie, annee, region, indicateur)
     DO UPDATE SET valeur = excluded.valeur, unite = excluded.unite";

/// Observation store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut store = Self { conn };
        store.ensure_schema()?;
        tracing::debug!(path = %path.display(), "opened observation store");
        Ok(store)
    }

    /// Opens a private in-memory database with the schema in place.
    pub fn open_in_memory() -> Result<Self> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Total number of stored rows.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn write_all(
        &mut self,
        sql: &str,
        delete_disease: Option<&str>,
        rows: &[Observation],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        if let Some(disease) = delete_disease {
            let deleted =
                tx.execute("DELETE FROM observations WHERE maladie = ?1", params![disease])?;
            tracing::debug!(disease, deleted, "deleted stored rows");
        }
        {
            let mut stmt = tx.prepare(sql)?;
            for obs in rows {
                stmt.execute(params![
                    obs.disease,
                    obs.year,
                    obs.region,
                    obs.indicator,
                    obs.value,
                    obs.unit
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }
}

impl ObservationStore for SqliteStore {
    fn ensure_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        if width == 0 {
            stmt.execute(params_from_iter(params.iter()))?;
            return Ok(Vec::new());
        }
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(row.get::<_, Value>(idx)?);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn rows_for_disease(&mut self, disease: &str) -> Result<Vec<Observation>> {
        let mut stmt = self.conn.prepare(
            "SELECT maladie, annee, region, indicateur, valeur, unite
             FROM observations WHERE maladie = ?1
             ORDER BY annee, region, indicateur",
        )?;
        let rows = stmt
            .query_map(params![disease], |row| {
                Ok(Observation {
                    disease: row.get(0)?,
                    year: row.get(1)?,
                    region: row.get(2)?,
                    indicator: row.get(3)?,
                    value: row.get(4)?,
                    unit: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn replace_disease(&mut self, disease: &str, rows: &[Observation]) -> Result<usize> {
        self.write_all(UPSERT_SQL, Some(disease), rows)
    }

    fn upsert(&mut self, rows: &[Observation]) -> Result<usize> {
        self.write_all(UPSERT_SQL, None, rows)
    }
}
