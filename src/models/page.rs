//! Page-level models: scraped metadata, summaries and the final export row.

use serde::{Deserialize, Serialize};

use super::KeywordImportance;

/// Title and meta description currently served by a page.
///
/// Empty strings mean "unknown", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub meta_description: String,
}

impl PageMeta {
    pub fn new(title: impl Into<String>, meta_description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            meta_description: meta_description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.meta_description.is_empty()
    }
}

/// One row per page that has at least one actionable keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageSummary {
    /// Dense 1-based ordinal in first-seen order.
    #[serde(rename = "URL_ID")]
    pub url_id: u32,
    #[serde(rename = "Page")]
    pub page: String,
    /// Sorted by descending click share, at most the configured limit.
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
    /// Index-aligned with `keywords`.
    #[serde(rename = "Keyword_Importance")]
    pub keyword_importance: Vec<KeywordImportance>,
    #[serde(rename = "Current_Title")]
    pub current_title: String,
    #[serde(rename = "Current_Meta")]
    pub current_meta: String,
    #[serde(rename = "Suggested_Title", skip_serializing_if = "Option::is_none")]
    pub suggested_title: Option<String>,
    #[serde(rename = "Suggested_Meta", skip_serializing_if = "Option::is_none")]
    pub suggested_meta: Option<String>,
}

impl PageSummary {
    /// Keywords with the given tier, in ranked order.
    pub fn keywords_with(&self, tier: KeywordImportance) -> Vec<&str> {
        self.keywords
            .iter()
            .zip(&self.keyword_importance)
            .filter(|(_, t)| **t == tier)
            .map(|(kw, _)| kw.as_str())
            .collect()
    }
}

/// Final output row. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionRow {
    #[serde(rename = "URL_ID")]
    pub url_id: u32,
    #[serde(rename = "Page")]
    pub page: String,
    #[serde(rename = "Current_Title")]
    pub current_title: String,
    #[serde(rename = "Current_Meta")]
    pub current_meta: String,
    #[serde(rename = "Suggested_Title")]
    pub suggested_title: String,
    #[serde(rename = "Suggested_Meta")]
    pub suggested_meta: String,
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
    #[serde(rename = "Keyword_Importance")]
    pub keyword_importance: Vec<KeywordImportance>,
}

impl SuggestionRow {
    pub const COLUMNS: [&'static str; 8] = [
        "URL_ID",
        "Page",
        "Current_Title",
        "Current_Meta",
        "Suggested_Title",
        "Suggested_Meta",
        "Keywords",
        "Keyword_Importance",
    ];
}
