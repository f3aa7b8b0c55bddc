//! The transformation stages chained after normalization.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sante_model::{CanonicalRow, read_canonical_rows};
use sante_normalize::{NormalizeOutcome, RegionCanonicalizer, normalize_table};
use sante_transform::{aggregate, clean_frame, merge_frames, partition_by_disease};

fn text_frame(columns: &[(&str, &[&str])]) -> DataFrame {
    DataFrame::new(
        columns
            .iter()
            .map(|(name, values)| {
                let values: Vec<String> = values.iter().map(|v| (*v).to_string()).collect();
                Series::new((*name).into(), values).into_column()
            })
            .collect(),
    )
    .unwrap()
}

fn normalized(df: &DataFrame, disease: &str) -> DataFrame {
    match normalize_table(df, disease).unwrap() {
        NormalizeOutcome::Normalized(frame) => frame,
        NormalizeOutcome::Unnormalizable { missing } => panic!("missing {missing:?}"),
    }
}

fn prepared(df: &DataFrame, disease: &str) -> DataFrame {
    let canonicalizer = RegionCanonicalizer::default();
    let cleaned = clean_frame(&normalized(df, disease), &canonicalizer).unwrap();
    aggregate(&cleaned.frame).unwrap()
}

fn key_and_value(row: &CanonicalRow) -> (String, i64, String, String, f64) {
    (
        row.disease.clone().unwrap(),
        row.year.unwrap(),
        row.region.clone().unwrap(),
        row.indicator.clone().unwrap(),
        row.value.unwrap(),
    )
}

#[test]
fn wide_source_is_reshaped_cleaned_and_averaged() {
    let wide = text_frame(&[
        ("Région", &["IDF", "Ile de France", "Corse"]),
        ("2018", &["1", "3", "x"]),
        ("2019", &["2", "2", "5"]),
    ]);

    let rows = read_canonical_rows(&prepared(&wide, "diabete")).unwrap();
    let rows: Vec<_> = rows.iter().map(key_and_value).collect();

    let expected: Vec<(String, i64, String, String, f64)> = vec![
        ("diabete".into(), 2018, "Île-de-France".into(), "valeur".into(), 2.0),
        ("diabete".into(), 2019, "Corse".into(), "valeur".into(), 5.0),
        ("diabete".into(), 2019, "Île-de-France".into(), "valeur".into(), 2.0),
    ];
    assert_eq!(rows, expected);
}

#[test]
fn merged_diseases_split_back_into_partitions() {
    let diabete = text_frame(&[
        ("annee", &["2020", "2020"]),
        ("region", &["Corse", "Corse"]),
        ("valeur", &["10", "20"]),
    ]);
    let cancer = text_frame(&[
        ("annee", &["2019"]),
        ("region", &["PACA"]),
        ("indicateur", &["incidence"]),
        ("valeur", &["7,25"]),
    ]);

    let merged = merge_frames(&[prepared(&diabete, "diabete"), prepared(&cancer, "cancer")])
        .unwrap();
    let rows = read_canonical_rows(&merged).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].disease.as_deref(), Some("cancer"));
    assert_eq!(rows[0].region.as_deref(), Some("Provence-Alpes-Côte d'Azur"));
    assert_eq!(rows[1].value, Some(15.0));

    let partitions = partition_by_disease(&merged).unwrap();
    let names: Vec<&str> = partitions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["cancer", "diabete"]);
    assert_eq!(partitions["diabete"].height(), 1);
}
