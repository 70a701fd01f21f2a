//! Keyword classification and page aggregation.
//!
//! Data flows strictly forward:
//! raw rows -> normalized records -> click share -> keyword tier ->
//! focus set (Primary + Secondary) -> action code -> page summaries.
//!
//! Everything here is synchronous and deterministic for a given input and
//! threshold. Network-bound work lives in [`crate::services`].

pub mod click_share;
pub mod merge;
pub mod normalize;
pub mod rules;
pub mod summarize;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{ActionCode, KeywordImportance, KeywordRecord, RawRecord};

pub use merge::{merge_suggestions, parse_suggestion, GenerationOutcome, GENERATION_ERROR_TITLE};
pub use normalize::CoercionFailure;
pub use rules::{ActionInput, ImportanceInput};
pub use summarize::summarize_pages;

/// Default impression threshold.
pub const DEFAULT_IMPRESSION_THRESHOLD: u64 = 100;
/// Default maximum keywords kept per page summary.
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Warning raised once per batch when any cell failed numeric coercion.
pub const COERCION_WARNING: &str = "Some values failed to convert, please check the data";

/// Thresholds applied to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Shared by the Ghost tier rule and every action rule.
    pub impression_threshold: u64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            impression_threshold: DEFAULT_IMPRESSION_THRESHOLD,
        }
    }
}

/// A fully classified batch.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Every input record, in input order, with derived fields filled in.
    pub records: Vec<KeywordRecord>,
    /// Mean CTR over the focus set. `None` when no focus record has a CTR.
    pub avg_ctr: Option<f64>,
    pub params: AnalysisParams,
    pub coercion_failures: Vec<CoercionFailure>,
}

impl Analysis {
    /// Primary and Secondary records.
    pub fn focus(&self) -> impl Iterator<Item = &KeywordRecord> {
        self.records.iter().filter(|r| r.is_focus())
    }

    /// Focus records with an action other than `no_action`.
    pub fn actionable(&self) -> impl Iterator<Item = &KeywordRecord> {
        self.records.iter().filter(|r| r.is_actionable())
    }

    /// Distinct pages of the actionable set, in first-seen order.
    pub fn actionable_pages(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.actionable()
            .filter(|r| seen.insert(r.page.as_str()))
            .map(|r| r.page.clone())
            .collect()
    }

    /// Batch-level warnings for the caller.
    pub fn warnings(&self) -> Vec<String> {
        if self.coercion_failures.is_empty() {
            Vec::new()
        } else {
            vec![format!(
                "{} ({} cells)",
                COERCION_WARNING,
                self.coercion_failures.len()
            )]
        }
    }

    /// Record counts per tier, in tier order.
    pub fn tier_counts(&self) -> Vec<(KeywordImportance, usize)> {
        let mut counts: HashMap<KeywordImportance, usize> = HashMap::new();
        for tier in self.records.iter().filter_map(|r| r.keyword_importance) {
            *counts.entry(tier).or_default() += 1;
        }
        [
            KeywordImportance::Primary,
            KeywordImportance::Secondary,
            KeywordImportance::Ghost,
            KeywordImportance::Ignore,
        ]
        .into_iter()
        .map(|tier| (tier, counts.get(&tier).copied().unwrap_or(0)))
        .collect()
    }

    /// Focus record counts per action, in rule order.
    pub fn action_counts(&self) -> Vec<(ActionCode, usize)> {
        let mut counts: HashMap<ActionCode, usize> = HashMap::new();
        for code in self.focus().filter_map(|r| r.action_code) {
            *counts.entry(code).or_default() += 1;
        }
        ActionCode::ALL
            .into_iter()
            .map(|code| (code, counts.get(&code).copied().unwrap_or(0)))
            .collect()
    }
}

/// Arithmetic mean of the known CTR values.
pub fn mean_ctr<'a>(records: impl IntoIterator<Item = &'a KeywordRecord>) -> Option<f64> {
    let (sum, count) = records
        .into_iter()
        .filter_map(|r| r.ctr)
        .fold((0.0, 0usize), |(sum, count), ctr| (sum + ctr, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Assign a tier to every record. Click share must already be annotated.
pub fn assign_importance(records: &mut [KeywordRecord], params: &AnalysisParams) {
    let impression_threshold = params.impression_threshold as f64;
    for record in records.iter_mut() {
        record.keyword_importance = Some(rules::classify_importance(&ImportanceInput {
            click_share: record.click_share,
            impressions: record.impressions,
            position: record.position,
            impression_threshold,
        }));
    }
}

/// Assign an action to every focus record against a fixed batch average.
pub fn assign_actions(records: &mut [KeywordRecord], avg_ctr: Option<f64>, params: &AnalysisParams) {
    let impression_threshold = params.impression_threshold as f64;
    for record in records.iter_mut().filter(|r| r.is_focus()) {
        record.action_code = Some(rules::classify_action(&ActionInput {
            impressions: record.impressions,
            ctr: record.ctr,
            position: record.position,
            avg_ctr,
            impression_threshold,
        }));
    }
}

/// Run normalization and both classification passes over a batch.
pub fn analyze(raw: &[RawRecord], params: &AnalysisParams) -> Analysis {
    let (mut records, coercion_failures) = normalize::normalize(raw);
    if !coercion_failures.is_empty() {
        warn!(
            "{} ({} cells in {} rows)",
            COERCION_WARNING,
            coercion_failures.len(),
            coercion_failures
                .iter()
                .map(|f| f.row)
                .collect::<HashSet<_>>()
                .len()
        );
    }

    click_share::annotate_click_share(&mut records);
    assign_importance(&mut records, params);

    let avg_ctr = mean_ctr(records.iter().filter(|r| r.is_focus()));
    assign_actions(&mut records, avg_ctr, params);

    debug!(
        "Classified {} records ({} focus, avg CTR {:?})",
        records.len(),
        records.iter().filter(|r| r.is_focus()).count(),
        avg_ctr
    );

    Analysis {
        records,
        avg_ctr,
        params: *params,
        coercion_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(page: &str, query: &str, clicks: &str, imp: &str, ctr: &str, pos: &str) -> RawRecord {
        RawRecord {
            page: page.to_string(),
            query: query.to_string(),
            clicks: clicks.to_string(),
            impressions: imp.to_string(),
            ctr: ctr.to_string(),
            position: pos.to_string(),
        }
    }

    #[test]
    fn test_boundary_click_share_is_primary() {
        let rows = [
            raw("PageA", "kw1", "8", "50", "5%", "3"),
            raw("PageA", "kw2", "2", "50", "5%", "25"),
        ];
        let analysis = analyze(&rows, &AnalysisParams { impression_threshold: 40 });

        let r = &analysis.records;
        assert_eq!(r[0].total_clicks_page, 10.0);
        assert_eq!(r[0].click_share, Some(0.8));
        assert_eq!(r[1].click_share, Some(0.2));
        assert_eq!(r[0].keyword_importance, Some(KeywordImportance::Primary));
        assert_eq!(r[1].keyword_importance, Some(KeywordImportance::Primary));
        assert_eq!(analysis.focus().count(), 2);
    }

    #[test]
    fn test_avg_ctr_over_focus_only() {
        let rows = [
            raw("a", "focus1", "5", "200", "10%", "3"),
            raw("a", "focus2", "5", "200", "2%", "8"),
            // Ignore tier: its CTR must not move the average.
            raw("b", "noise", "0", "1", "90%", "80"),
        ];
        let analysis = analyze(&rows, &AnalysisParams::default());

        let avg = analysis.avg_ctr.unwrap();
        assert!((avg - 0.06).abs() < 1e-12);
        assert_eq!(
            analysis.records[0].action_code,
            Some(ActionCode::NoChangeNeededHighPerformer)
        );
        assert_eq!(
            analysis.records[1].action_code,
            Some(ActionCode::StrengthenTitleMetaInternalLinking)
        );
        assert_eq!(analysis.records[2].keyword_importance, Some(KeywordImportance::Ignore));
        assert_eq!(analysis.records[2].action_code, None);
    }

    #[test]
    fn test_null_cells_do_not_abort_and_warn_once() {
        let rows = [
            raw("a", "ok", "5", "200", "10%", "3"),
            raw("a", "broken", "x", "??", "", "y"),
        ];
        let analysis = analyze(&rows, &AnalysisParams::default());

        assert_eq!(analysis.records.len(), 2);
        assert_eq!(analysis.coercion_failures.len(), 4);
        assert_eq!(analysis.warnings().len(), 1);
        assert_eq!(analysis.records[1].keyword_importance, Some(KeywordImportance::Ignore));
    }

    #[test]
    fn test_empty_focus_has_no_average() {
        let rows = [raw("a", "q", "0", "5", "1%", "90")];
        let analysis = analyze(&rows, &AnalysisParams::default());
        assert_eq!(analysis.avg_ctr, None);
        assert_eq!(analysis.actionable().count(), 0);
        assert!(analysis.actionable_pages().is_empty());
    }

    #[test]
    fn test_actionable_pages_first_seen_order() {
        let rows = [
            raw("z", "z1", "1", "500", "1%", "3"),
            raw("a", "a1", "1", "500", "9%", "3"),
            raw("z", "z2", "1", "500", "9%", "3"),
        ];
        let analysis = analyze(&rows, &AnalysisParams::default());
        assert_eq!(analysis.actionable_pages(), vec!["z".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_counts_cover_every_record() {
        let rows = [
            raw("a", "q1", "9", "500", "9%", "3"),
            raw("a", "q2", "1", "500", "1%", "40"),
            raw("a", "q3", "0", "5", "1%", "90"),
        ];
        let analysis = analyze(&rows, &AnalysisParams::default());

        let tiers: usize = analysis.tier_counts().iter().map(|(_, n)| n).sum();
        assert_eq!(tiers, 3);
        let actions: usize = analysis.action_counts().iter().map(|(_, n)| n).sum();
        assert_eq!(actions, analysis.focus().count());
    }

    #[test]
    fn test_mean_ctr_skips_missing() {
        let mut a = KeywordRecord::new("p", "a");
        a.ctr = Some(0.1);
        let b = KeywordRecord::new("p", "b");
        assert_eq!(mean_ctr([&a, &b]), Some(0.1));
        assert_eq!(mean_ctr([&b]), None);
    }
}
