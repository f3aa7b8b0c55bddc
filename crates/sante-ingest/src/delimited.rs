//! Delimited text reading with separator sniffing.

use csv::ReaderBuilder;
use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::error::{IngestError, Result};
use crate::table::{RawTable, frame_from_text};

const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Decodes source bytes, stripping a UTF-8 BOM.
///
/// Files that are not valid UTF-8 are read as Windows-1252, the usual
/// encoding of older French administrative exports.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            tracing::debug!("input is not UTF-8, decoding as windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
    }
}

fn field_count(line: &str, delimiter: u8) -> usize {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader
        .records()
        .next()
        .and_then(|record| record.ok())
        .map_or(0, |record| record.len())
}

/// Picks the delimiter producing the most fields on the header line.
///
/// Candidates are `,`, `;` and tab; ties go to the comma.
///
/// # Examples
///
/// ```
/// use sante_ingest::sniff_delimiter;
///
/// assert_eq!(sniff_delimiter("annee;region;valeur\n2020;Corse;1,5"), b';');
/// assert_eq!(sniff_delimiter("annee,region\n"), b',');
/// assert_eq!(sniff_delimiter("seul\n"), b',');
/// ```
pub fn sniff_delimiter(text: &str) -> u8 {
    let Some(header) = text.lines().find(|line| !line.trim().is_empty()) else {
        return b',';
    };
    let mut best = (b',', field_count(header, b','));
    for delimiter in CANDIDATE_DELIMITERS.into_iter().skip(1) {
        let count = field_count(header, delimiter);
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

/// Reads a delimited file held in memory into a raw table.
///
/// The first non-blank record is the header.
pub fn read_csv_bytes(label: &str, bytes: &[u8]) -> Result<RawTable> {
    let text = decode_text(bytes);
    let delimiter = sniff_delimiter(&text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            label: label.to_string(),
            source,
        })?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        if header.is_none() {
            if cells.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            header = Some(cells);
        } else {
            rows.push(cells);
        }
    }

    let Some(header) = header else {
        return Err(IngestError::NoTables {
            label: label.to_string(),
        });
    };
    tracing::debug!(
        label,
        delimiter = %char::from(delimiter).escape_default(),
        columns = header.len(),
        rows = rows.len(),
        "read delimited table"
    );
    let data = frame_from_text(&header, &rows)?;
    Ok(RawTable::new(label, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::AnyValue;

    #[test]
    fn test_read_semicolon_file_with_bom() {
        let bytes = "\u{feff}annee;region;valeur\n2020;Bretagne;7,5\n2021;Corse;3\n";
        let table = read_csv_bytes("diabete.csv", bytes.as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["annee", "region", "valeur"]);
        assert_eq!(table.height(), 2);
        let value = table.data.column("valeur").unwrap().get(0).unwrap();
        assert!(matches!(value, AnyValue::String("7,5")));
    }

    #[test]
    fn test_read_tab_file() {
        let bytes = b"region\t2019\t2020\nBretagne\t1\t2\n";
        let table = read_csv_bytes("wide.tsv", bytes).unwrap();
        assert_eq!(table.column_names(), vec!["region", "2019", "2020"]);
    }

    #[test]
    fn test_windows_1252_punctuation() {
        let bytes = b"region,valeur\nC\xf4te d\x92Azur \x80,1\n";
        let table = read_csv_bytes("cp1252.csv", bytes).unwrap();
        let region = table.data.column("region").unwrap().get(0).unwrap();
        assert!(matches!(region, AnyValue::String("Côte d’Azur €")));
    }

    #[test]
    fn test_latin1_fallback() {
        let bytes = b"r\xe9gion,valeur\nCorse,1\n";
        let table = read_csv_bytes("latin1.csv", bytes).unwrap();
        assert_eq!(table.column_names(), vec!["région", "valeur"]);
    }

    #[test]
    fn test_empty_input_has_no_table() {
        let err = read_csv_bytes("empty.csv", b"\n\n").unwrap_err();
        assert!(matches!(err, IngestError::NoTables { .. }));
    }

    #[test]
    fn test_quoted_delimiters_do_not_count() {
        assert_eq!(sniff_delimiter("\"a;b\",c\n"), b',');
    }
}
