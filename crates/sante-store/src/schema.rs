//! Storage schema.

pub const TABLE_NAME: &str = "observations";
pub const INDEX_NAME: &str = "idx_obs_miay";

/// Creates the observation table and its lookup index when missing.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS observations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    maladie     TEXT    NOT NULL,
    annee       INTEGER NOT NULL,
    region      TEXT    NOT NULL,
    indicateur  TEXT    NOT NULL,
    valeur      REAL    NOT NULL,
    unite       TEXT    NOT NULL DEFAULT '',
    UNIQUE (maladie, annee, region, indicateur)
);
CREATE INDEX IF NOT EXISTS idx_obs_miay
    ON observations (maladie, indicateur, annee, region);
"#;
