//! Numeric coercion of raw metric cells.
//!
//! A cell that does not parse becomes `None` and is reported; it never aborts
//! the batch.

use serde::Serialize;

use crate::models::{KeywordRecord, RawRecord};

/// A single cell that failed numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionFailure {
    /// Zero-based data row index (header excluded).
    pub row: usize,
    pub column: &'static str,
    pub value: String,
}

/// Parse a plain number. Non-finite values count as failures.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Impressions may carry thousands separators ("1,234").
pub fn parse_impressions(raw: &str) -> Option<f64> {
    parse_number(&raw.replace(',', ""))
}

/// CTR arrives in percent ("3.5%" or "3.5") and is stored as a fraction.
pub fn parse_ctr(raw: &str) -> Option<f64> {
    parse_number(&raw.replace('%', "")).map(|pct| pct / 100.0)
}

/// Normalize raw rows into keyword records.
///
/// Returns the records in input order plus every cell that failed coercion.
pub fn normalize(raw: &[RawRecord]) -> (Vec<KeywordRecord>, Vec<CoercionFailure>) {
    let mut failures = Vec::new();
    let mut records = Vec::with_capacity(raw.len());

    for (row, input) in raw.iter().enumerate() {
        let mut coerce = |column: &'static str, value: &str, parse: fn(&str) -> Option<f64>| {
            let parsed = parse(value);
            if parsed.is_none() {
                failures.push(CoercionFailure {
                    row,
                    column,
                    value: value.to_string(),
                });
            }
            parsed
        };

        let mut record = KeywordRecord::new(input.page.clone(), input.query.clone());
        record.clicks = coerce("Clicks", &input.clicks, parse_number);
        record.impressions = coerce("Impressions", &input.impressions, parse_impressions);
        record.ctr = coerce("CTR", &input.ctr, parse_ctr);
        record.position = coerce("Position", &input.position, parse_number);
        records.push(record);
    }

    (records, failures)
}
