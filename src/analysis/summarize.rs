//! Per-page keyword ranking.
//!
//! Groups actionable records by page, ranks each group by click share and
//! keeps the top N: a windowed top-N over the actionable view.

use std::collections::HashMap;

use crate::models::{KeywordRecord, PageMeta, PageSummary};

/// Build one summary per page with at least one actionable keyword.
///
/// `url_id` is a dense 1-based ordinal in first-seen order over the
/// actionable records. Title and meta come from `metas`; a page missing from
/// the map gets empty strings. A `max_keywords` of 0 is treated as 1 so no
/// summary is ever empty.
pub fn summarize_pages(
    records: &[KeywordRecord],
    metas: &HashMap<String, PageMeta>,
    max_keywords: usize,
) -> Vec<PageSummary> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&KeywordRecord>)> = Vec::new();

    for record in records.iter().filter(|r| r.is_actionable()) {
        let idx = *order.entry(record.page.as_str()).or_insert_with(|| {
            groups.push((record.page.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(record);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(idx, (page, mut group))| {
            // Stable: equal shares keep input order.
            group.sort_by(|a, b| {
                let a = a.click_share.unwrap_or(0.0);
                let b = b.click_share.unwrap_or(0.0);
                b.total_cmp(&a)
            });
            group.truncate(max_keywords.max(1));

            let meta = metas.get(page).cloned().unwrap_or_default();
            let (keywords, keyword_importance): (Vec<String>, Vec<_>) = group
                .iter()
                .filter_map(|r| r.keyword_importance.map(|tier| (r.query.clone(), tier)))
                .unzip();

            PageSummary {
                url_id: (idx + 1) as u32,
                page: page.to_string(),
                keywords,
                keyword_importance,
                current_title: meta.title,
                current_meta: meta.meta_description,
                suggested_title: None,
                suggested_meta: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionCode, KeywordImportance};

    fn actionable(page: &str, query: &str, share: f64) -> KeywordRecord {
        let mut r = KeywordRecord::new(page, query);
        r.click_share = Some(share);
        r.keyword_importance = Some(if share >= 0.2 {
            KeywordImportance::Primary
        } else {
            KeywordImportance::Secondary
        });
        r.action_code = Some(ActionCode::ReviseTitleMetaForClicks);
        r
    }

    #[test]
    fn test_ranks_and_aligns_keywords() {
        let records = vec![
            actionable("a", "low", 0.1),
            actionable("a", "high", 0.7),
            actionable("a", "mid", 0.2),
        ];
        let summaries = summarize_pages(&records, &HashMap::new(), 10);

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.keywords, vec!["high", "mid", "low"]);
        assert_eq!(
            s.keyword_importance,
            vec![
                KeywordImportance::Primary,
                KeywordImportance::Primary,
                KeywordImportance::Secondary
            ]
        );
        assert_eq!(s.current_title, "");
        assert_eq!(s.current_meta, "");
    }

    #[test]
    fn test_truncates_to_limit_without_padding() {
        let records: Vec<_> = (0..15)
            .map(|i| actionable("a", &format!("kw{i}"), i as f64 / 100.0))
            .chain([actionable("b", "only", 1.0)])
            .collect();
        let summaries = summarize_pages(&records, &HashMap::new(), 10);

        assert_eq!(summaries[0].keywords.len(), 10);
        assert_eq!(summaries[0].keywords[0], "kw14");
        assert_eq!(summaries[0].keyword_importance.len(), 10);
        assert_eq!(summaries[1].keywords, vec!["only"]);
    }

    #[test]
    fn test_zero_limit_keeps_top_keyword() {
        let records = vec![actionable("a", "low", 0.1), actionable("a", "high", 0.9)];
        let summaries = summarize_pages(&records, &HashMap::new(), 0);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].keywords, vec!["high"]);
    }

    #[test]
    fn test_url_ids_dense_in_first_seen_order() {
        let mut skipped = actionable("m", "none", 0.5);
        skipped.action_code = Some(ActionCode::NoAction);
        let records = vec![
            actionable("z", "z1", 0.5),
            skipped,
            actionable("b", "b1", 0.5),
            actionable("z", "z2", 0.5),
            actionable("c", "c1", 0.5),
        ];
        let summaries = summarize_pages(&records, &HashMap::new(), 10);

        let ids: Vec<(u32, &str)> = summaries.iter().map(|s| (s.url_id, s.page.as_str())).collect();
        assert_eq!(ids, vec![(1, "z"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn test_page_without_actionable_keywords_is_absent() {
        let mut ghost = actionable("g", "g1", 0.0);
        ghost.keyword_importance = Some(KeywordImportance::Ghost);
        ghost.action_code = None;
        let summaries = summarize_pages(&[ghost], &HashMap::new(), 10);
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_uses_scraped_meta() {
        let mut metas = HashMap::new();
        metas.insert("a".to_string(), PageMeta::new("Title A", "Meta A"));
        let summaries = summarize_pages(&[actionable("a", "q", 0.5)], &metas, 10);

        assert_eq!(summaries[0].current_title, "Title A");
        assert_eq!(summaries[0].current_meta, "Meta A");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            actionable("a", "first", 0.5),
            actionable("a", "second", 0.5),
        ];
        let summaries = summarize_pages(&records, &HashMap::new(), 10);
        assert_eq!(summaries[0].keywords, vec!["first", "second"]);
    }
}
