//! Per-page click totals and each keyword's share of them.

use std::collections::HashMap;

use crate::models::KeywordRecord;

/// Sum clicks per page, treating missing clicks as zero.
pub fn page_click_totals(records: &[KeywordRecord]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for record in records {
        *totals.entry(record.page.clone()).or_default() += record.clicks.unwrap_or(0.0);
    }
    totals
}

/// Annotate every record with its page total and click share.
///
/// Share is zero when the page has no clicks, and `None` when the record's
/// own clicks are missing.
pub fn annotate_click_share(records: &mut [KeywordRecord]) {
    let totals = page_click_totals(records);

    for record in records.iter_mut() {
        let total = totals.get(&record.page).copied().unwrap_or(0.0);
        record.total_clicks_page = total;
        record.click_share = record
            .clicks
            .map(|clicks| if total > 0.0 { clicks / total } else { 0.0 });
    }
}
