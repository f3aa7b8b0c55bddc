use sante_model::{Observation, observations_to_frame, read_canonical_rows};
use sante_output::read_canonical_csv;
use sante_store::{
    ObservationStore, SqliteStore, SyncOptions, Value, WriteMode, backup_file_name, sync_disease,
};
use tempfile::TempDir;

fn obs(disease: &str, year: i64, region: &str, value: f64) -> Observation {
    Observation::new(disease, year, region, "prevalence", value, "%")
}

#[test]
fn replace_writes_backup_of_previous_rows() {
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open_in_memory().unwrap();
    let options = SyncOptions {
        mode: WriteMode::Replace,
        backup_dir: Some(dir.path().join("backups")),
    };

    let first = observations_to_frame(&[obs("diabete", 2019, "Corse", 5.0)]).unwrap();
    let report = sync_disease(&mut store, "diabete", &first, &options).unwrap();
    assert_eq!(report.written, 1);
    assert!(report.backup.is_none(), "nothing stored yet, nothing to back up");

    let second = observations_to_frame(&[
        obs("diabete", 2020, "Corse", 6.0),
        obs("diabete", 2020, "Bretagne", 7.0),
    ])
    .unwrap();
    let report = sync_disease(&mut store, "diabete", &second, &options).unwrap();
    assert_eq!(report.written, 2);

    let backup = report.backup.expect("backup path");
    assert_eq!(
        backup.file_name().unwrap().to_str().unwrap(),
        backup_file_name("diabete")
    );
    let saved = read_canonical_rows(&read_canonical_csv(&backup).unwrap()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].year, Some(2019));

    let stored = store.rows_for_disease("diabete").unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|o| o.year == 2020));
}

#[test]
fn failed_backup_does_not_block_the_write() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let mut store = SqliteStore::open_in_memory().unwrap();
    store.upsert(&[obs("cancer", 2019, "Corse", 1.0)]).unwrap();

    let options = SyncOptions {
        mode: WriteMode::Replace,
        backup_dir: Some(blocker.join("backups")),
    };
    let frame = observations_to_frame(&[obs("cancer", 2020, "Corse", 2.0)]).unwrap();
    let report = sync_disease(&mut store, "cancer", &frame, &options).unwrap();
    assert!(report.backup.is_none());
    assert_eq!(store.rows_for_disease("cancer").unwrap(), vec![obs("cancer", 2020, "Corse", 2.0)]);
}

#[test]
fn upsert_keeps_unrelated_rows() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .upsert(&[obs("sida", 2019, "Corse", 1.0), obs("sida", 2020, "Corse", 2.0)])
        .unwrap();

    let options = SyncOptions {
        mode: WriteMode::Upsert,
        backup_dir: None,
    };
    let frame = observations_to_frame(&[obs("sida", 2020, "Corse", 9.0)]).unwrap();
    sync_disease(&mut store, "sida", &frame, &options).unwrap();

    let stored = store.rows_for_disease("sida").unwrap();
    assert_eq!(stored, vec![obs("sida", 2019, "Corse", 1.0), obs("sida", 2020, "Corse", 9.0)]);
}

#[test]
fn rows_of_other_diseases_are_ignored() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let frame = observations_to_frame(&[
        obs("diabete", 2020, "Corse", 1.0),
        obs("cancer", 2020, "Corse", 2.0),
    ])
    .unwrap();
    let report = sync_disease(&mut store, "diabete", &frame, &SyncOptions::default()).unwrap();
    assert_eq!(report.written, 1);
    assert_eq!(report.skipped_foreign, 1);
    assert!(store.rows_for_disease("cancer").unwrap().is_empty());
}

/// Appends a row without a usable value to every replace, so the insert
/// fails after the delete has run.
struct NullValueStore {
    inner: SqliteStore,
}

impl ObservationStore for NullValueStore {
    fn ensure_schema(&mut self) -> sante_store::Result<()> {
        self.inner.ensure_schema()
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> sante_store::Result<Vec<Vec<Value>>> {
        self.inner.execute(sql, params)
    }

    fn rows_for_disease(&mut self, disease: &str) -> sante_store::Result<Vec<Observation>> {
        self.inner.rows_for_disease(disease)
    }

    fn replace_disease(
        &mut self,
        disease: &str,
        rows: &[Observation],
    ) -> sante_store::Result<usize> {
        let mut rows = rows.to_vec();
        rows.push(obs(disease, 2099, "Corse", f64::NAN));
        self.inner.replace_disease(disease, &rows)
    }

    fn upsert(&mut self, rows: &[Observation]) -> sante_store::Result<usize> {
        self.inner.upsert(rows)
    }
}

#[test]
fn transaction_failure_leaves_previous_rows() {
    let mut store = NullValueStore {
        inner: SqliteStore::open_in_memory().unwrap(),
    };
    let before = vec![obs("diabete", 2019, "Corse", 5.0)];
    store.inner.upsert(&before).unwrap();

    let frame = observations_to_frame(&[
        obs("diabete", 2021, "Corse", 1.0),
        obs("diabete", 2021, "Bretagne", 2.0),
    ])
    .unwrap();
    assert!(sync_disease(&mut store, "diabete", &frame, &SyncOptions::default()).is_err());
    assert_eq!(store.rows_for_disease("diabete").unwrap(), before);
}

#[test]
fn replace_with_repeated_keys_keeps_last_value() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.upsert(&[obs("diabete", 2019, "Corse", 5.0)]).unwrap();

    let frame = observations_to_frame(&[
        obs("diabete", 2021, "Corse", 1.0),
        obs("diabete", 2021, "Corse", 2.0),
    ])
    .unwrap();
    let report = sync_disease(&mut store, "diabete", &frame, &SyncOptions::default()).unwrap();
    assert_eq!(report.written, 2);
    assert_eq!(store.rows_for_disease("diabete").unwrap(), vec![obs("diabete", 2021, "Corse", 2.0)]);
}
