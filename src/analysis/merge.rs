//! Joining generated suggestions back onto page summaries.

use std::collections::HashMap;

use crate::models::{PageSummary, SuggestionRow};

/// Title written in place of a suggestion when generation failed.
pub const GENERATION_ERROR_TITLE: &str = "An error occurred";

/// Raw generator reply, or the error detail when the call failed.
pub type GenerationOutcome = Result<String, String>;

const TITLE_LABEL: &str = "title:";
const META_LABEL: &str = "meta description:";

/// Value after `label` if `line` starts with it, ignoring ASCII case.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| line[label.len()..].trim())
}

/// Extract the `Title:` and `Meta Description:` lines from a reply.
///
/// Labels match case-insensitively after trimming the line. A missing label
/// yields an empty string; when a label repeats the last one wins.
pub fn parse_suggestion(text: &str) -> (String, String) {
    let mut title = String::new();
    let mut meta = String::new();

    for line in text.lines().map(str::trim) {
        if let Some(value) = strip_label(line, TITLE_LABEL) {
            title = value.to_string();
        } else if let Some(value) = strip_label(line, META_LABEL) {
            meta = value.to_string();
        }
    }

    (title, meta)
}

/// Fill in the suggestion fields of one summary.
pub fn apply_outcome(summary: &mut PageSummary, outcome: Option<&GenerationOutcome>) {
    let (title, meta) = match outcome {
        Some(Ok(text)) => parse_suggestion(text),
        Some(Err(detail)) => (GENERATION_ERROR_TITLE.to_string(), detail.clone()),
        None => (
            GENERATION_ERROR_TITLE.to_string(),
            "no suggestion was generated for this page".to_string(),
        ),
    };
    summary.suggested_title = Some(title);
    summary.suggested_meta = Some(meta);
}

impl From<PageSummary> for SuggestionRow {
    fn from(summary: PageSummary) -> Self {
        Self {
            url_id: summary.url_id,
            page: summary.page,
            current_title: summary.current_title,
            current_meta: summary.current_meta,
            suggested_title: summary.suggested_title.unwrap_or_default(),
            suggested_meta: summary.suggested_meta.unwrap_or_default(),
            keywords: summary.keywords,
            keyword_importance: summary.keyword_importance,
        }
    }
}

/// Join outcomes (keyed by `url_id`) onto summaries, one row per summary.
///
/// A failed or missing outcome affects only its own row. Rows come out in
/// ascending `url_id` order.
pub fn merge_suggestions(
    summaries: Vec<PageSummary>,
    outcomes: &HashMap<u32, GenerationOutcome>,
) -> Vec<SuggestionRow> {
    let mut rows: Vec<SuggestionRow> = summaries
        .into_iter()
        .map(|mut summary| {
            let outcome = outcomes.get(&summary.url_id);
            apply_outcome(&mut summary, outcome);
            SuggestionRow::from(summary)
        })
        .collect();
    rows.sort_by_key(|row| row.url_id);
    rows
}
