//! Read queries over stored observations.

use rusqlite::types::Value;
use sante_model::Observation;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::store::ObservationStore;

/// Default row limit of [`query_observations`].
pub const DEFAULT_LIMIT: usize = 100;

/// Filter for [`query_observations`]; unset fields match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationFilter {
    pub disease: Option<String>,
    pub indicator: Option<String>,
    pub year: Option<i64>,
    pub region: Option<String>,
    pub limit: usize,
}

impl Default for ObservationFilter {
    fn default() -> Self {
        Self {
            disease: None,
            indicator: None,
            year: None,
            region: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Filter for [`indicator_stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub disease: Option<String>,
    pub indicator: Option<String>,
    pub year: Option<i64>,
}

/// Mean, minimum and maximum of one indicator for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorStats {
    pub indicator: String,
    pub year: i64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: i64,
}

/// Accumulates `column = ?n` conditions and their parameters.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn push(&mut self, column: &str, value: Option<Value>) {
        if let Some(value) = value {
            self.params.push(value);
            self.clauses.push(format!("{column} = ?{}", self.params.len()));
        }
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn text(row: &[Value], idx: usize, column: &'static str) -> Result<String> {
    match row.get(idx) {
        Some(Value::Text(s)) => Ok(s.clone()),
        _ => Err(StoreError::InvalidRow { column }),
    }
}

fn integer(row: &[Value], idx: usize, column: &'static str) -> Result<i64> {
    match row.get(idx) {
        Some(Value::Integer(i)) => Ok(*i),
        _ => Err(StoreError::InvalidRow { column }),
    }
}

fn real(row: &[Value], idx: usize, column: &'static str) -> Result<f64> {
    match row.get(idx) {
        Some(Value::Real(f)) => Ok(*f),
        Some(Value::Integer(i)) => Ok(*i as f64),
        _ => Err(StoreError::InvalidRow { column }),
    }
}

/// Observations matching `filter`, most recent year first.
pub fn query_observations<S: ObservationStore + ?Sized>(
    store: &mut S,
    filter: &ObservationFilter,
) -> Result<Vec<Observation>> {
    let mut conditions = Conditions::default();
    conditions.push("maladie", filter.disease.clone().map(Value::Text));
    conditions.push("indicateur", filter.indicator.clone().map(Value::Text));
    conditions.push("annee", filter.year.map(Value::Integer));
    conditions.push("region", filter.region.clone().map(Value::Text));

    let mut params = conditions.params.clone();
    params.push(Value::Integer(i64::try_from(filter.limit).unwrap_or(i64::MAX)));
    let sql = format!(
        "SELECT maladie, annee, region, indicateur, valeur, unite FROM observations{} \
         ORDER BY annee DESC, maladie, region, indicateur LIMIT ?{}",
        conditions.where_clause(),
        params.len()
    );

    store
        .execute(&sql, &params)?
        .iter()
        .map(|row| {
            Ok(Observation {
                disease: text(row, 0, "maladie")?,
                year: integer(row, 1, "annee")?,
                region: text(row, 2, "region")?,
                indicator: text(row, 3, "indicateur")?,
                value: real(row, 4, "valeur")?,
                unit: text(row, 5, "unite")?,
            })
        })
        .collect()
}

/// Per (indicator, year) statistics of the stored values matching `filter`.
pub fn indicator_stats<S: ObservationStore + ?Sized>(
    store: &mut S,
    filter: &StatsFilter,
) -> Result<Vec<IndicatorStats>> {
    let mut conditions = Conditions::default();
    conditions.push("maladie", filter.disease.clone().map(Value::Text));
    conditions.push("indicateur", filter.indicator.clone().map(Value::Text));
    conditions.push("annee", filter.year.map(Value::Integer));

    let sql = format!(
        "SELECT indicateur, annee, AVG(valeur), MIN(valeur), MAX(valeur), COUNT(*) \
         FROM observations{} GROUP BY indicateur, annee ORDER BY indicateur, annee",
        conditions.where_clause()
    );

    store
        .execute(&sql, &conditions.params)?
        .iter()
        .map(|row| {
            Ok(IndicatorStats {
                indicator: text(row, 0, "indicateur")?,
                year: integer(row, 1, "annee")?,
                mean: real(row, 2, "valeur")?,
                min: real(row, 3, "valeur")?,
                max: real(row, 4, "valeur")?,
                count: integer(row, 5, "count")?,
            })
        })
        .collect()
}
