//! Table export (CSV, JSON, JSON Lines).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{KeywordImportance, KeywordRecord, PageSummary, SuggestionRow};

/// Byte order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

/// Separator for list-valued cells in CSV output.
pub const LIST_SEPARATOR: &str = ";";

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Jsonl,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("jsonl") | Some("ndjson") => Self::Jsonl,
            _ => Self::Csv,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A row type with a fixed CSV layout.
trait TableRow: Serialize {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn joined(items: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn tiers(importance: &[KeywordImportance]) -> String {
    joined(importance.iter().map(|t| t.as_str()))
}

impl TableRow for SuggestionRow {
    const HEADER: &'static [&'static str] = &SuggestionRow::COLUMNS;

    fn cells(&self) -> Vec<String> {
        vec![
            self.url_id.to_string(),
            self.page.clone(),
            self.current_title.clone(),
            self.current_meta.clone(),
            self.suggested_title.clone(),
            self.suggested_meta.clone(),
            joined(&self.keywords),
            tiers(&self.keyword_importance),
        ]
    }
}

impl TableRow for KeywordRecord {
    const HEADER: &'static [&'static str] = &[
        "Page",
        "Query",
        "Clicks",
        "Impressions",
        "CTR",
        "Position",
        "Total_Clicks_Page",
        "Click_Share",
        "Keyword_Importance",
        "Action_Code",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.page.clone(),
            self.query.clone(),
            number(self.clicks),
            number(self.impressions),
            number(self.ctr),
            number(self.position),
            self.total_clicks_page.to_string(),
            number(self.click_share),
            self.keyword_importance
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            self.action_code
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
        ]
    }
}

impl TableRow for PageSummary {
    const HEADER: &'static [&'static str] = &[
        "URL_ID",
        "Page",
        "Keywords",
        "Keyword_Importance",
        "Current_Title",
        "Current_Meta",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.url_id.to_string(),
            self.page.clone(),
            joined(&self.keywords),
            tiers(&self.keyword_importance),
            self.current_title.clone(),
            self.current_meta.clone(),
        ]
    }
}

fn write_table<W: Write, T: TableRow>(
    mut writer: W,
    rows: &[T],
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => {
            writer.write_all(UTF8_BOM)?;
            let mut csv = csv::Writer::from_writer(writer);
            csv.write_record(T::HEADER)?;
            for row in rows {
                csv.write_record(row.cells())?;
            }
            csv.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        ExportFormat::Jsonl => {
            for row in rows {
                serde_json::to_writer(&mut writer, row)?;
                writeln!(writer)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Write the final suggestions table.
pub fn write_suggestions<W: Write>(
    writer: W,
    rows: &[SuggestionRow],
    format: ExportFormat,
) -> Result<(), ExportError> {
    write_table(writer, rows, format)
}

/// Write the per-keyword focus table.
pub fn write_focus_records<W: Write>(
    writer: W,
    records: &[KeywordRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    write_table(writer, records, format)
}

/// Write page summaries before generation.
pub fn write_page_summaries<W: Write>(
    writer: W,
    summaries: &[PageSummary],
    format: ExportFormat,
) -> Result<(), ExportError> {
    write_table(writer, summaries, format)
}

/// Open a buffered file for writing, creating parent directories.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
