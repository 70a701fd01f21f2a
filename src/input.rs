//! Search analytics export ingestion.
//!
//! Reads a CSV table and checks it carries every required column before any
//! row is processed. Cells are kept as strings; numeric coercion happens in
//! the analysis normalizer.

use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::models::RawRecord;

/// Columns every input table must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Page", "Query", "Clicks", "Impressions", "CTR", "Position"];

/// Errors that reject a whole input table.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Required fields are missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Failed to read input: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    page: usize,
    query: usize,
    clicks: usize,
    impressions: usize,
    ctr: usize,
    position: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, InputError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |column: &str| names.iter().position(|name| *name == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| find(*column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(InputError::MissingColumns(missing));
        }

        // All present, checked above
        let at = |column: &str| find(column).unwrap_or_default();
        Ok(Self {
            page: at("Page"),
            query: at("Query"),
            clicks: at("Clicks"),
            impressions: at("Impressions"),
            ctr: at("CTR"),
            position: at("Position"),
        })
    }

    fn extract(&self, row: &csv::StringRecord) -> RawRecord {
        let cell = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        RawRecord {
            page: cell(self.page),
            query: cell(self.query),
            clicks: cell(self.clicks),
            impressions: cell(self.impressions),
            ctr: cell(self.ctr),
            position: cell(self.position),
        }
    }
}

/// Read raw records from any CSV source.
///
/// Extra columns are ignored. Short rows yield empty cells, which the
/// normalizer reports as coercion failures.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        records.push(columns.extract(&row?));
    }

    debug!("Read {} input rows", records.len());
    Ok(records)
}

/// Read raw records from a CSV file on disk.
pub fn read_records_from_path(path: &Path) -> Result<Vec<RawRecord>, InputError> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_required_columns_in_any_order() {
        let data = "Query,Page,Extra,CTR,Clicks,Position,Impressions\n\
                    shoes,https://a.example/,x,3.5%,12,4.2,\"1,234\"\n";
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.page, "https://a.example/");
        assert_eq!(r.query, "shoes");
        assert_eq!(r.clicks, "12");
        assert_eq!(r.impressions, "1,234");
        assert_eq!(r.ctr, "3.5%");
        assert_eq!(r.position, "4.2");
    }

    #[test]
    fn test_missing_columns_are_named() {
        let data = "Page,Query,Clicks\nhttps://a.example/,shoes,1\n";
        let err = read_records(data.as_bytes()).unwrap_err();

        match err {
            InputError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Impressions", "CTR", "Position"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_columns_message() {
        let err = InputError::MissingColumns(vec!["CTR".into(), "Position".into()]);
        assert_eq!(err.to_string(), "Required fields are missing: CTR, Position");
    }

    #[test]
    fn test_byte_order_mark_on_first_header() {
        let data = "\u{feff}Page,Query,Clicks,Impressions,CTR,Position\np,q,1,2,3%,4\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records[0].page, "p");
    }

    #[test]
    fn test_short_rows_yield_empty_cells() {
        let data = "Page,Query,Clicks,Impressions,CTR,Position\np,q,1\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records[0].clicks, "1");
        assert_eq!(records[0].position, "");
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let data = "Page,Query,Clicks,Impressions,CTR,Position\n";
        assert!(read_records(data.as_bytes()).unwrap().is_empty());
    }
}
